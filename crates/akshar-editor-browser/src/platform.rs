//! Browser/OS detection for platform-specific keybindings.

/// What we know about the host browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Platform {
    /// Apple platform: Cmd is the primary modifier.
    pub mac: bool,
    pub ios: bool,
    pub android: bool,
}

impl Platform {
    /// Classify from a `navigator.platform` / `navigator.userAgent` pair.
    pub fn from_navigator(platform: &str, user_agent: &str) -> Self {
        let ios = ["iPhone", "iPad", "iPod"]
            .iter()
            .any(|device| platform.contains(device) || user_agent.contains(device));
        Self {
            mac: ios || platform.starts_with("Mac") || user_agent.contains("Macintosh"),
            ios,
            android: user_agent.contains("Android"),
        }
    }
}

/// Detect the current platform. Defaults to non-Apple outside a window.
pub fn platform() -> Platform {
    let Some(window) = web_sys::window() else {
        return Platform::default();
    };
    let navigator = window.navigator();
    Platform::from_navigator(
        &navigator.platform().unwrap_or_default(),
        &navigator.user_agent().unwrap_or_default(),
    )
}
