//! Outbound links: building the WhatsApp hand-off URL and opening links in
//! the system browser.
//!
//! Opening a link is the last thing this program does for an order; whatever
//! happens in the browser afterwards is out of our hands.

use std::process::{Command, Stdio};
use std::thread;

use thiserror::Error;

/// Base of the click-to-chat messaging link.
pub const MESSAGING_BASE: &str = "https://wa.me";

/// Number every order summary is sent to.
pub const ORDER_DESTINATION: &str = "233271326182";

#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Opens a URL in a new browsing context.
pub trait LinkOpener {
    fn open(&mut self, url: &str) -> Result<(), HandoffError>;
}

/// Delegates to the platform's "open this URL" command.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl LinkOpener for SystemOpener {
    fn open(&mut self, url: &str) -> Result<(), HandoffError> {
        let (program, args): (&'static str, Vec<&str>) = if cfg!(target_os = "macos") {
            ("open", vec![url])
        } else if cfg!(target_os = "windows") {
            ("cmd", vec!["/C", "start", "", url])
        } else {
            ("xdg-open", vec![url])
        };

        tracing::info!(%url, program, "opening external link");
        launch(program, &args).map(|_| ())
    }
}

/// Start `program` detached from the terminal. The returned thread reaps the
/// child once it exits so no zombie lingers.
fn launch(program: &'static str, args: &[&str]) -> Result<thread::JoinHandle<()>, HandoffError> {
    // The terminal belongs to the TUI; keep the launcher quiet.
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| HandoffError::Launch { program, source })?;

    Ok(thread::spawn(move || match child.wait() {
        Ok(status) if !status.success() => {
            tracing::warn!(program, %status, "link launcher exited with failure");
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(program, error = %e, "failed to wait on link launcher"),
    }))
}

/// Percent-encode `text` for a query value. Spaces become `%20`, not `+`.
/// Stricter than `encodeURIComponent`: `! ' ( ) ~` are escaped as well.
pub fn encode_component(text: &str) -> String {
    url::form_urlencoded::byte_serialize(text.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Build `https://wa.me/<digits>?text=<encoded message>`.
/// Non-digit characters in `destination` are dropped.
pub fn messaging_link(destination: &str, message: &str) -> String {
    let digits: String = destination.chars().filter(char::is_ascii_digit).collect();
    format!("{MESSAGING_BASE}/{digits}?text={}", encode_component(message))
}

/// Records opened links instead of launching anything.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct RecordingOpener {
    pub opened: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
}

#[cfg(test)]
impl RecordingOpener {
    pub fn links(&self) -> Vec<String> {
        self.opened.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
impl LinkOpener for RecordingOpener {
    fn open(&mut self, url: &str) -> Result<(), HandoffError> {
        if let Ok(mut v) = self.opened.lock() {
            v.push(url.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_component_escapes_query_values() {
        assert_eq!(encode_component("a b"), "a%20b");
        assert_eq!(encode_component("!'()~"), "%21%27%28%29%7E");
        assert_eq!(encode_component("1+1=2"), "1%2B1%3D2");
        assert_eq!(encode_component("*x*\n"), "*x*%0A");
        assert_eq!(encode_component("¢"), "%C2%A2");
    }

    #[test]
    fn messaging_link_strips_non_digits() {
        let link = messaging_link("+233 27-132 6182", "hi there");
        assert_eq!(link, "https://wa.me/233271326182?text=hi%20there");
    }

    #[cfg(unix)]
    #[test]
    fn launched_process_is_reaped() {
        let reaper = launch("true", &[]).unwrap();
        assert!(reaper.join().is_ok());
    }

    #[test]
    fn launch_reports_missing_program() {
        let err = launch("stagefront-no-such-launcher", &["x"]).unwrap_err();
        assert!(matches!(
            err,
            HandoffError::Launch {
                program: "stagefront-no-such-launcher",
                ..
            }
        ));
    }

    #[test]
    fn recording_opener_shares_links_between_clones() {
        let rec = RecordingOpener::default();
        let mut boxed: Box<dyn LinkOpener> = Box::new(rec.clone());
        boxed.open("https://example.com").unwrap();
        assert_eq!(rec.links(), vec!["https://example.com".to_string()]);
    }
}
