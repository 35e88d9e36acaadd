//! Interactive console.
//!
//! Each input line is one UI event. The console owns the authorization
//! context and the interceptor, renders the profile badge and the gated
//! business actions, and prints prompt transitions through an
//! [`InterceptorObserver`].

use scorecard_access::{
    ActionInterceptor, Authenticator, GateView, InterceptorObserver, LoginAttempt, ProfileView,
    PromptClosed, ProtectedAction, Role, RoleBadge,
};
use std::cell::RefCell;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use tracing::debug;

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    WhoAmI,
    Actions,
    Run(usize),
    Login { username: String, secret: String },
    Cancel,
    Logout,
    Quit,
}

/// Error returned for unparseable input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCommandError(String);

impl fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ParseCommandError {}

impl Command {
    /// Parses one input line. Returns `Ok(None)` for a blank line.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown commands or missing arguments.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseCommandError> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match (verb, args.as_slice()) {
            ("help" | "?", []) => Self::Help,
            ("whoami", []) => Self::WhoAmI,
            ("actions" | "ls", []) => Self::Actions,
            ("run", [index]) => {
                let index = index
                    .parse()
                    .map_err(|_| ParseCommandError(format!("not an action number: {index}")))?;
                Self::Run(index)
            }
            ("login", [username, secret]) => Self::Login {
                username: (*username).to_string(),
                secret: (*secret).to_string(),
            },
            ("cancel", []) => Self::Cancel,
            ("logout", []) => Self::Logout,
            ("quit" | "exit", []) => Self::Quit,
            ("run", _) => return Err(ParseCommandError("usage: run <number>".to_string())),
            ("login", _) => {
                return Err(ParseCommandError(
                    "usage: login <username> <password>".to_string(),
                ));
            }
            (other, _) => {
                return Err(ParseCommandError(format!(
                    "unknown command: {other} (try 'help')"
                )));
            }
        };
        Ok(Some(command))
    }

    /// Returns the command's verb, for logging without arguments.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::WhoAmI => "whoami",
            Self::Actions => "actions",
            Self::Run(_) => "run",
            Self::Login { .. } => "login",
            Self::Cancel => "cancel",
            Self::Logout => "logout",
            Self::Quit => "quit",
        }
    }
}

/// Whether the console loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

const HELP: &str = "\
Commands:
  whoami                      show the signed-in user
  actions                     list actions and whether you may run them
  run <number>                trigger an action
  login <username> <password> sign in (answers an open login prompt)
  cancel                      dismiss the login prompt
  logout                      sign out
  quit                        exit";

/// Queues prompt transitions for printing after the current command.
#[derive(Clone, Default)]
struct PromptNotices(Rc<RefCell<Vec<String>>>);

impl PromptNotices {
    fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

impl InterceptorObserver for PromptNotices {
    fn prompt_opened(&mut self, action: &str) {
        self.0.borrow_mut().push(format!(
            "Sign in required to '{action}'. Use: login <username> <password>, or cancel"
        ));
    }

    fn login_failed(&mut self, _action: &str) {
        self.0
            .borrow_mut()
            .push("Invalid username or password. Try again, or cancel".to_string());
    }

    fn prompt_closed(&mut self, action: &str, reason: PromptClosed) {
        let notice = match reason {
            PromptClosed::LoggedIn => format!("Signed in. Run '{action}' again to continue"),
            PromptClosed::Cancelled => "Login cancelled".to_string(),
        };
        self.0.borrow_mut().push(notice);
    }
}

fn action(label: &str) -> ProtectedAction<String> {
    ProtectedAction::new(label, label.to_string())
}

/// The business actions offered by the console.
fn catalog() -> Vec<ProtectedAction<String>> {
    vec![
        action("View borrowers").requires(Role::Viewer),
        action("Create trading account"),
        action("Edit risk factor"),
        action("Compute scorecard"),
        action("Delete inventory item")
            .requires(Role::Admin)
            .with_fallback("Delete inventory item (admin only)".to_string()),
    ]
}

fn badge_name(badge: RoleBadge) -> &'static str {
    match badge {
        RoleBadge::Red => "red",
        RoleBadge::Blue => "blue",
        RoleBadge::Green => "green",
    }
}

/// Console front end over an authenticator.
pub struct Console<A> {
    auth: A,
    interceptor: ActionInterceptor,
    actions: Vec<ProtectedAction<String>>,
    notices: PromptNotices,
}

impl<A: Authenticator> Console<A> {
    /// Creates a console over `auth`.
    #[must_use]
    pub fn new(auth: A) -> Self {
        let notices = PromptNotices::default();
        let mut interceptor = ActionInterceptor::new();
        interceptor.subscribe(Box::new(notices.clone()));
        Self {
            auth,
            interceptor,
            actions: catalog(),
            notices,
        }
    }

    /// Returns the authorization context.
    #[must_use]
    pub fn auth(&self) -> &A {
        &self.auth
    }

    /// Returns the interceptor.
    #[must_use]
    pub fn interceptor(&self) -> &ActionInterceptor {
        &self.interceptor
    }

    /// Reads commands from `input` until EOF or `quit`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub fn run(&mut self, input: impl BufRead, mut out: impl Write) -> io::Result<()> {
        self.render_profile(&mut out)?;
        for line in input.lines() {
            let line = line?;
            match Command::parse(&line) {
                Ok(None) => {}
                Ok(Some(command)) => {
                    if self.execute(command, &mut out)? == Flow::Exit {
                        break;
                    }
                }
                Err(e) => writeln!(out, "{e}")?,
            }
        }
        out.flush()
    }

    /// Executes one command.
    ///
    /// # Errors
    ///
    /// Returns an error if writing output fails.
    pub fn execute(&mut self, command: Command, out: &mut impl Write) -> io::Result<Flow> {
        debug!(command = command.name(), "console command");
        if self.auth.refresh() {
            writeln!(out, "Session expired")?;
        }
        match command {
            Command::Help => writeln!(out, "{HELP}")?,
            Command::WhoAmI => self.render_profile(out)?,
            Command::Actions => self.render_actions(out)?,
            Command::Run(index) => self.run_action(index, out)?,
            Command::Login { username, secret } => self.login(&username, &secret, out)?,
            Command::Cancel => {
                if !self.interceptor.cancel() {
                    writeln!(out, "No login prompt is open")?;
                }
            }
            Command::Logout => {
                let view = ProfileView::sign_out(&mut self.auth);
                writeln!(out, "Signed out")?;
                self.render_view(&view, out)?;
            }
            Command::Quit => return Ok(Flow::Exit),
        }
        self.flush_notices(out)?;
        Ok(Flow::Continue)
    }

    fn login(&mut self, username: &str, secret: &str, out: &mut impl Write) -> io::Result<()> {
        match self.interceptor.submit_login(&mut self.auth, username, secret) {
            LoginAttempt::Accepted | LoginAttempt::Rejected => Ok(()),
            LoginAttempt::NotPrompting => {
                if self.auth.login(username, secret) {
                    writeln!(out, "Signed in")?;
                    self.render_profile(out)
                } else {
                    writeln!(out, "Invalid username or password")
                }
            }
        }
    }

    fn run_action(&mut self, index: usize, out: &mut impl Write) -> io::Result<()> {
        let Some(action) = index.checked_sub(1).and_then(|i| self.actions.get(i)) else {
            return writeln!(out, "No action numbered {index}");
        };

        if let GateView::Fallback(fallback) = action.view(&self.auth) {
            return writeln!(out, "{fallback}: not available");
        }

        let label = action.label().to_string();
        if self.interceptor.state().is_prompting() {
            return writeln!(out, "Finish or cancel the open login prompt first");
        }
        if let Some(()) = action.activate(&mut self.interceptor, &self.auth, || ()) {
            writeln!(out, "{label}: done")?;
        }
        Ok(())
    }

    fn render_profile(&self, out: &mut impl Write) -> io::Result<()> {
        self.render_view(&ProfileView::from_source(&self.auth), out)
    }

    fn render_view(&self, view: &ProfileView, out: &mut impl Write) -> io::Result<()> {
        match view {
            ProfileView::SignedOut => writeln!(out, "Not logged in"),
            ProfileView::SignedIn {
                initial,
                username,
                email,
                role,
            } => writeln!(
                out,
                "[{initial}] {username} <{email}> {} ({})",
                role.display_name(),
                badge_name(role.badge())
            ),
        }
    }

    fn render_actions(&self, out: &mut impl Write) -> io::Result<()> {
        for (i, action) in self.actions.iter().enumerate() {
            let line = match action.view(&self.auth) {
                GateView::Content(view) => format!("{view}"),
                GateView::Guarded(view) => {
                    format!("{view} [sign in as {}]", action.required_role())
                }
                GateView::Fallback(view) => format!("{view}"),
            };
            writeln!(out, "{:>2}. {line}", i + 1)?;
        }
        Ok(())
    }

    fn flush_notices(&self, out: &mut impl Write) -> io::Result<()> {
        for notice in self.notices.drain() {
            writeln!(out, "{notice}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use scorecard_access::{
        AuthService, CredentialDirectory, IdentitySource, MemoryStorage, SessionStore,
    };
    use scorecard_core::ManualClock;

    type TestConsole = Console<AuthService<CredentialDirectory, MemoryStorage>>;

    fn console() -> TestConsole {
        Console::new(AuthService::restore(
            CredentialDirectory::demo(),
            SessionStore::new(MemoryStorage::new()),
        ))
    }

    fn script<A: Authenticator>(console: &mut Console<A>, input: &str) -> String {
        let mut out = Vec::new();
        console.run(input.as_bytes(), &mut out).expect("console run");
        String::from_utf8(out).expect("utf-8 output")
    }

    #[test]
    fn parse_commands() {
        assert_eq!(Command::parse("   "), Ok(None));
        assert_eq!(Command::parse("whoami"), Ok(Some(Command::WhoAmI)));
        assert_eq!(Command::parse("run 3"), Ok(Some(Command::Run(3))));
        assert_eq!(
            Command::parse("login demo demo"),
            Ok(Some(Command::Login {
                username: "demo".to_string(),
                secret: "demo".to_string(),
            }))
        );
        assert!(Command::parse("run x").is_err());
        assert!(Command::parse("login demo").is_err());
        assert!(Command::parse("dance").is_err());
    }

    #[test]
    fn signed_out_run_prompts_and_suppresses() {
        let mut console = console();
        let output = script(&mut console, "run 2\n");
        assert!(output.contains("Not logged in"));
        assert!(output.contains("Sign in required to 'Create trading account'"));
        assert!(!output.contains("done"));
        assert!(console.interceptor().state().is_prompting());
    }

    #[test]
    fn login_from_prompt_requires_rerun() {
        let mut console = console();
        let output = script(
            &mut console,
            "run 2\nlogin demo wrong\nlogin demo demo\nrun 2\n",
        );
        assert!(output.contains("Invalid username or password. Try again"));
        assert!(output.contains("Run 'Create trading account' again"));
        assert_eq!(output.matches("Create trading account: done").count(), 1);
        assert!(console.auth().is_authenticated());
    }

    #[test]
    fn admin_only_action_shows_fallback() {
        let mut console = console();
        let output = script(&mut console, "login user user123\nrun 5\nactions\n");
        assert!(output.contains("[U] user <user@scorecard.com> User (blue)"));
        assert!(output.contains("Delete inventory item (admin only): not available"));
        assert!(output.contains(" 1. View borrowers"));
        assert!(!console.interceptor().state().is_prompting());
    }

    #[test]
    fn cancel_and_logout() {
        let mut console = console();
        let output = script(
            &mut console,
            "cancel\nrun 1\ncancel\nlogin admin admin123\nlogout\n",
        );
        assert!(output.contains("No login prompt is open"));
        assert!(output.contains("Login cancelled"));
        assert!(output.contains("Signed out"));
        assert!(!console.auth().is_authenticated());
    }

    #[test]
    fn expired_session_is_destroyed_before_next_command() {
        let clock = ManualClock::starting_now();
        let store = SessionStore::with_clock(MemoryStorage::new(), clock.clone());
        let mut console = Console::new(AuthService::restore(CredentialDirectory::demo(), store));

        script(&mut console, "login demo demo\n");
        assert_eq!(console.auth().store().backend().len(), 2);

        clock.advance(Duration::hours(24) + Duration::seconds(1));
        let output = script(&mut console, "run 2\n");
        assert!(output.contains("Session expired"));
        assert!(output.contains("Sign in required to 'Create trading account'"));
        assert!(console.auth().store().backend().is_empty());
    }

    #[test]
    fn quit_stops_reading() {
        let mut console = console();
        let output = script(&mut console, "quit\nlogin admin admin123\n");
        assert!(!output.contains("Signed in"));
        assert!(!console.auth().is_authenticated());
    }
}
