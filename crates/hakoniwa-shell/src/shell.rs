//! The command layer: dispatch, prompt, and the VFS/host mode toggle.

use std::io::{self, Write};
use std::str::FromStr;

use hakoniwa_vfs::{Content, HostFs, Origin, VfsOps, VirtualFs};
use strum::VariantNames;

const YELLOW: &str = "\x1b[93m";
const GREEN: &str = "\x1b[92m";
const RESET: &str = "\x1b[0m";

const SEPARATOR: &str = "--------------------------------------------------";

/// Built-in commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display, strum::VariantNames)]
#[strum(serialize_all = "lowercase")]
pub enum Command {
    Ls,
    Cd,
    Pwd,
    Cat,
    Touch,
    Rm,
    Echo,
    Whoami,
    Hostname,
    Vfs,
    Exit,
}

/// Whether the session should keep going after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Split a line into command and arguments. Blank lines yield `None`.
pub fn parse_input(line: &str) -> Option<(&str, Vec<&str>)> {
    let mut words = line.split_whitespace();
    let command = words.next()?;
    Some((command, words.collect()))
}

/// An interactive session over a [`VirtualFs`] and a read-only [`HostFs`].
///
/// Mutating commands (`touch`, `rm`) are only allowed in VFS mode.
#[derive(Debug)]
pub struct Shell {
    vfs: VirtualFs,
    host: HostFs,
    vfs_mode: bool,
    color: bool,
    username: String,
    hostname: String,
}

impl Shell {
    /// Create a session in host mode, identified as the current user.
    pub fn new(vfs: VirtualFs, host: HostFs) -> Self {
        let hostname = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "localhost".to_string());
        Self {
            vfs,
            host,
            vfs_mode: false,
            color: true,
            username: whoami::username(),
            hostname,
        }
    }

    /// Override the user and host shown in the prompt.
    pub fn with_identity(mut self, username: impl Into<String>, hostname: impl Into<String>) -> Self {
        self.username = username.into();
        self.hostname = hostname.into();
        self
    }

    pub fn with_vfs_mode(mut self, vfs_mode: bool) -> Self {
        self.vfs_mode = vfs_mode;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn vfs(&self) -> &VirtualFs {
        &self.vfs
    }

    pub fn vfs_mode(&self) -> bool {
        self.vfs_mode
    }

    fn backend(&self) -> &dyn VfsOps {
        if self.vfs_mode {
            return &self.vfs;
        }
        &self.host
    }

    fn backend_mut(&mut self) -> &mut dyn VfsOps {
        if self.vfs_mode {
            return &mut self.vfs;
        }
        &mut self.host
    }

    /// The prompt for the active mode.
    pub fn prompt(&self) -> String {
        if self.vfs_mode {
            return format!(
                "[VFS]{}@{}:{}$ ",
                self.username,
                self.hostname,
                self.vfs.current_path()
            );
        }

        let cwd = self.host.cwd();
        let shown = match dirs::home_dir() {
            Some(home) => match cwd.strip_prefix(&home) {
                Ok(rest) if rest.as_os_str().is_empty() => "~".to_string(),
                Ok(rest) => format!("~/{}", rest.display()),
                Err(_) => cwd.display().to_string(),
            },
            None => cwd.display().to_string(),
        };
        format!("{}@{}:{}$ ", self.username, self.hostname, shown)
    }

    /// Greeting printed once at interactive start.
    pub fn banner(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "Welcome to the hakoniwa shell.")?;
        writeln!(out, "{}", self.source_description())?;
        writeln!(out, "Commands: {}", Command::VARIANTS.join(", "))?;
        writeln!(out, "Type 'exit' to quit.")
    }

    fn source_description(&self) -> String {
        match self.vfs.origin() {
            Origin::Scaffold => "VFS: default layout".to_string(),
            Origin::Archive(path) => format!("VFS loaded from: {}", path.display()),
            Origin::Degraded { source, reason } => {
                format!("VFS: failed to load {}: {reason}", source.display())
            }
        }
    }

    /// Run one input line.
    pub fn execute_line(&mut self, line: &str, out: &mut impl Write) -> io::Result<Flow> {
        let Some((name, args)) = parse_input(line) else {
            return Ok(Flow::Continue);
        };

        let Ok(command) = Command::from_str(name) else {
            writeln!(out, "{name}: command not found")?;
            return Ok(Flow::Continue);
        };

        tracing::debug!(%command, ?args, vfs_mode = self.vfs_mode, "execute");
        match command {
            Command::Ls => self.cmd_ls(&args, out)?,
            Command::Cd => self.cmd_cd(&args, out)?,
            Command::Pwd => writeln!(out, "{}", self.backend().current_path())?,
            Command::Cat => self.cmd_cat(&args, out)?,
            Command::Touch => self.cmd_touch(&args, out)?,
            Command::Rm => self.cmd_rm(&args, out)?,
            Command::Echo => writeln!(out, "{}", args.join(" "))?,
            Command::Whoami => writeln!(out, "{}", self.username)?,
            Command::Hostname => writeln!(out, "{}", self.hostname)?,
            Command::Vfs => self.cmd_vfs(&args, out)?,
            Command::Exit => {
                writeln!(out, "Goodbye.")?;
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    /// Run startup-script lines, echoing each after the prompt.
    ///
    /// The transcript is framed by separator lines, including when a line
    /// exits early; that case returns [`Flow::Exit`].
    pub fn run_script(&mut self, lines: &[String], out: &mut impl Write) -> io::Result<Flow> {
        writeln!(out, "Running startup script ({} commands):", lines.len())?;
        writeln!(out, "{SEPARATOR}")?;

        let mut flow = Flow::Continue;
        for line in lines {
            if self.color {
                writeln!(out, "{}{GREEN}{line}{RESET}", self.prompt())?;
            } else {
                writeln!(out, "{}{line}", self.prompt())?;
            }
            flow = self.execute_line(line, out)?;
            if flow == Flow::Exit {
                break;
            }
        }

        writeln!(out, "{SEPARATOR}")?;
        writeln!(out, "Startup script finished")?;
        writeln!(out)?;
        Ok(flow)
    }

    fn cmd_ls(&self, args: &[&str], out: &mut impl Write) -> io::Result<()> {
        let path = args.first().copied().unwrap_or(".");
        match self.backend().list_directory(path) {
            Ok(entries) => {
                for entry in entries {
                    if !entry.kind.is_dir() {
                        writeln!(out, "{}", entry.name)?;
                    } else if self.color {
                        writeln!(out, "{YELLOW}{}/{RESET}", entry.name)?;
                    } else {
                        writeln!(out, "{}/", entry.name)?;
                    }
                }
                Ok(())
            }
            Err(e) => writeln!(out, "ls: {e}"),
        }
    }

    fn cmd_cd(&mut self, args: &[&str], out: &mut impl Write) -> io::Result<()> {
        let default = if self.vfs_mode { "/" } else { "~" };
        let path = args.first().copied().unwrap_or(default);
        match self.backend_mut().change_directory(path) {
            Ok(()) => Ok(()),
            Err(e) => writeln!(out, "cd: {e}"),
        }
    }

    fn cmd_cat(&self, args: &[&str], out: &mut impl Write) -> io::Result<()> {
        let Some(path) = args.first() else {
            return writeln!(out, "usage: cat <file>");
        };
        match self.backend().read_file(path) {
            Ok(Content::Text(text)) => writeln!(out, "{}", text.trim_end_matches('\n')),
            Ok(Content::Binary(encoded)) => writeln!(out, "[binary:base64] {encoded}"),
            Err(e) => writeln!(out, "cat: {e}"),
        }
    }

    fn cmd_touch(&mut self, args: &[&str], out: &mut impl Write) -> io::Result<()> {
        if args.is_empty() {
            return writeln!(out, "usage: touch <file>... [-d|--display]");
        }
        if !self.vfs_mode {
            return writeln!(out, "touch: only available in VFS mode");
        }

        let display_time = args.iter().any(|a| matches!(*a, "-d" | "--display"));
        for path in args.iter().filter(|a| !matches!(**a, "-d" | "--display")) {
            match self.vfs.create_file(path, "", display_time) {
                Ok(touched) => writeln!(out, "touch: {touched}: '{path}'")?,
                Err(e) => writeln!(out, "touch: {e}")?,
            }
        }
        Ok(())
    }

    fn cmd_rm(&mut self, args: &[&str], out: &mut impl Write) -> io::Result<()> {
        if args.is_empty() {
            return writeln!(out, "usage: rm <file>...");
        }
        if !self.vfs_mode {
            return writeln!(out, "rm: only available in VFS mode");
        }

        for path in args {
            match self.vfs.remove_file(path) {
                Ok(()) => writeln!(out, "rm: file removed: '{path}'")?,
                Err(e) => writeln!(out, "rm: {e}")?,
            }
        }
        Ok(())
    }

    fn cmd_vfs(&mut self, args: &[&str], out: &mut impl Write) -> io::Result<()> {
        match args.first().copied() {
            None => writeln!(out, "usage: vfs [on|off|status]"),
            Some("on") => {
                self.vfs_mode = true;
                writeln!(out, "VFS mode on")
            }
            Some("off") => {
                self.vfs_mode = false;
                writeln!(out, "VFS mode off")
            }
            Some("status") => {
                let state = if self.vfs_mode { "on" } else { "off" };
                writeln!(out, "VFS mode: {state}")?;
                writeln!(out, "{}", self.source_description())
            }
            Some(other) => writeln!(out, "vfs: unknown subcommand: {other}"),
        }
    }
}
