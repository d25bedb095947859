//! Welcome Tutorial - Hand existing users over to the tutorial service
//!
//! Existing accounts skip the wizard entirely and are sent to the
//! tutorial over the session bus instead.

use anyhow::{Context, Result};
use zbus::{proxy, Connection};

/// Fallback when no locale is configured
pub const DEFAULT_LANGUAGE: &str = "en_US";

#[proxy(
    interface = "com.endlessm.Tutorial.FBERemote",
    default_service = "com.endlessm.Tutorial",
    default_path = "/com/endlessm/Tutorial/FBERemote"
)]
trait FbeRemote {
    /// Returns once the user has finished the tutorial
    fn play_tutorial(&self, fullscreen: bool, language: &str) -> zbus::Result<()>;
}

/// Play the tutorial and wait until the user is done with it
pub async fn play(language: &str) -> Result<()> {
    // No method timeout is configured on the connection: the call only
    // returns when the tutorial ends.
    let connection = Connection::session()
        .await
        .context("Failed to connect to session D-Bus")?;

    let proxy = FbeRemoteProxy::new(&connection)
        .await
        .context("Could not get D-Bus proxy for tutorial FBE remote")?;

    proxy
        .play_tutorial(false, language)
        .await
        .context("Can't play tutorial from FBE remote")?;

    Ok(())
}

/// Run the tutorial on a private runtime; failures are logged
pub fn launch() {
    let language = current_language();
    tracing::info!("Launching welcome tutorial ({})", language);

    let result = tokio::runtime::Runtime::new()
        .context("Failed to start async runtime")
        .and_then(|rt| rt.block_on(play(&language)));

    if let Err(e) = result {
        tracing::error!("{:#}", e);
    }
}

/// The session language as a bare locale name (e.g. `pt_BR`)
pub fn current_language() -> String {
    let value = ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty());

    language_from_locale(value.as_deref())
}

fn language_from_locale(locale: Option<&str>) -> String {
    let Some(locale) = locale else {
        return DEFAULT_LANGUAGE.to_string();
    };

    let bare = locale
        .split(['.', '@'])
        .next()
        .unwrap_or_default();

    match bare {
        "" | "C" | "POSIX" => DEFAULT_LANGUAGE.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_locale() {
        assert_eq!(language_from_locale(Some("pt_BR.UTF-8")), "pt_BR");
        assert_eq!(language_from_locale(Some("sr_RS@latin")), "sr_RS");
        assert_eq!(language_from_locale(Some("de_DE")), "de_DE");
    }

    #[test]
    fn test_language_fallbacks() {
        assert_eq!(language_from_locale(None), DEFAULT_LANGUAGE);
        assert_eq!(language_from_locale(Some("C.UTF-8")), DEFAULT_LANGUAGE);
        assert_eq!(language_from_locale(Some("POSIX")), DEFAULT_LANGUAGE);
    }
}
