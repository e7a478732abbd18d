//! User configuration: keybindings, motion tuning and persistence.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/landing-fx/config.toml` (default `~/.config/landing-fx/config.toml`).

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::controller::MotionSettings;
use crate::core::typewriter::TypewriterTiming;

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions in the page preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    NextLink,
    PrevLink,
    FollowLink,
    ToggleMenu,
    CloseMenu,
    ScrollToTop,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used when writing the config file).
    pub const ALL: &[Action] = &[
        Action::ScrollUp,
        Action::ScrollDown,
        Action::PageUp,
        Action::PageDown,
        Action::NextLink,
        Action::PrevLink,
        Action::FollowLink,
        Action::ToggleMenu,
        Action::CloseMenu,
        Action::ScrollToTop,
        Action::Quit,
    ];

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::ScrollUp => "scroll_up",
            Action::ScrollDown => "scroll_down",
            Action::PageUp => "page_up",
            Action::PageDown => "page_down",
            Action::NextLink => "next_link",
            Action::PrevLink => "prev_link",
            Action::FollowLink => "follow_link",
            Action::ToggleMenu => "toggle_menu",
            Action::CloseMenu => "close_menu",
            Action::ScrollToTop => "scroll_to_top",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding: key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    fn modifier_prefix(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s
    }

    /// User-friendly display string (e.g. `"Ctrl+Home"`, `"↓"`, `"q"`).
    pub fn display(&self) -> String {
        let key = match self.code {
            KeyCode::Up => "↑".to_string(),
            KeyCode::Down => "↓".to_string(),
            KeyCode::Left => "←".to_string(),
            KeyCode::Right => "→".to_string(),
            _ => key_name(self.code),
        };
        format!("{}{key}", self.modifier_prefix())
    }

    /// Serialise to config-file format (e.g. `"Ctrl+Home"`, `"Down"`, `"q"`).
    fn to_config_string(&self) -> String {
        format!("{}{}", self.modifier_prefix(), key_name(self.code))
    }

    /// Parse a key string like `"Ctrl+Home"`, `"PageDown"`, `"q"`, `"Enter"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            k if k.starts_with('f') && k.len() > 1 => {
                let n: u8 = k[1..].parse().ok()?;
                KeyCode::F(n)
            }
            // Single characters keep their case ("M" stays distinct from "m").
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".into(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Up => "Up".into(),
        KeyCode::Down => "Down".into(),
        KeyCode::Left => "Left".into(),
        KeyCode::Right => "Right".into(),
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Esc".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::BackTab => "BackTab".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::PageUp => "PageUp".into(),
        KeyCode::PageDown => "PageDown".into(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration: keybindings, motion settings and host layout.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    pub motion: MotionSettings,
    /// Terminals narrower than this many columns get the mobile menu.
    pub mobile_breakpoint: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            motion: MotionSettings {
                // Native scrolling in the terminal is an instant jump.
                native_smooth_scroll: false,
                ..MotionSettings::default()
            },
            mobile_breakpoint: 80,
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let shift = KeyModifiers::SHIFT;
        let ctrl = KeyModifiers::CONTROL;
        let mut m = HashMap::new();

        m.insert(ScrollUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(ScrollDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(Action::PageUp, vec![KeyBind::new(KeyCode::PageUp, n)]);
        m.insert(Action::PageDown, vec![KeyBind::new(KeyCode::PageDown, n), KeyBind::new(Char(' '), n)]);
        m.insert(NextLink, vec![KeyBind::new(Tab, n)]);
        m.insert(PrevLink, vec![KeyBind::new(BackTab, shift)]);
        m.insert(FollowLink, vec![KeyBind::new(Enter, n)]);
        m.insert(ToggleMenu, vec![KeyBind::new(Char('m'), n)]);
        m.insert(CloseMenu, vec![KeyBind::new(Esc, n)]);
        m.insert(ScrollToTop, vec![KeyBind::new(Home, ctrl)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}: scroll | {}: link | {}: follow | {}: menu | {}: top | {}: quit",
            self.short_binding(Action::ScrollUp),
            self.short_binding(Action::ScrollDown),
            self.short_binding(Action::NextLink),
            self.short_binding(Action::FollowLink),
            self.short_binding(Action::ToggleMenu),
            self.short_binding(Action::ScrollToTop),
            self.short_binding(Action::Quit),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "config unreadable; using defaults");
                Self::default()
            }
        }
    }

    /// Persist current config to disk and return where it went.
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(path)
    }

    fn parse(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            if config.apply_setting(key, value) {
                continue;
            }

            let Some(action) = Action::from_config_key(key) else {
                tracing::debug!(key, "unknown config key ignored");
                continue;
            };

            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }

    /// Apply one motion/layout setting.  Returns `false` if `key` is not a
    /// setting.  Unparseable values leave the default in place.
    fn apply_setting(&mut self, key: &str, value: &str) -> bool {
        let m = &mut self.motion;
        let ms = |lo: u64, hi: u64| value.parse::<u64>().ok().map(|v| Duration::from_millis(v.clamp(lo, hi)));
        let px = || value.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| v.clamp(0.0, 10_000.0));
        let ratio = || value.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| v.clamp(0.0, 1.0));

        match key {
            "scroll_duration_ms" => set(&mut m.scroll_duration, ms(0, 10_000)),
            "scroll_throttle_ms" => set(&mut m.scroll_throttle, ms(0, 1000)),
            "active_offset_px" => set(&mut m.active_offset, px()),
            "scroll_top_threshold_px" => set(&mut m.scroll_top_threshold, px()),
            "header_threshold_px" => set(&mut m.header_threshold, px()),
            "fade_threshold" => set(&mut m.fade_threshold, ratio()),
            "fade_bottom_margin_px" => set(&mut m.fade_bottom_margin, px()),
            "reveal_threshold" => set(&mut m.reveal_threshold, ratio()),
            "typewriter_delay_ms" => set(&mut m.typewriter.delay, ms(0, 60_000)),
            "typewriter_interval_ms" => set(&mut m.typewriter.interval, ms(1, 5000)),
            "typewriter_hold_ms" => set(&mut m.typewriter.hold, ms(0, 60_000)),
            "native_scroll" => set(&mut m.native_smooth_scroll, value.parse::<bool>().ok()),
            "mobile_breakpoint" => set(
                &mut self.mobile_breakpoint,
                value.parse::<u16>().ok().map(|v| v.clamp(20, 400)),
            ),
            _ => return false,
        }
        true
    }

    fn serialise(&self) -> String {
        let m = &self.motion;
        let TypewriterTiming {
            delay,
            interval,
            hold,
        } = m.typewriter;
        let mut lines = vec![
            "# landing-fx configuration".to_string(),
            String::new(),
            "# Motion".to_string(),
            format!("scroll_duration_ms = {}", m.scroll_duration.as_millis()),
            format!("scroll_throttle_ms = {}", m.scroll_throttle.as_millis()),
            format!("active_offset_px = {}", m.active_offset),
            format!("scroll_top_threshold_px = {}", m.scroll_top_threshold),
            format!("header_threshold_px = {}", m.header_threshold),
            format!("fade_threshold = {}", m.fade_threshold),
            format!("fade_bottom_margin_px = {}", m.fade_bottom_margin),
            format!("reveal_threshold = {}", m.reveal_threshold),
            format!("typewriter_delay_ms = {}", delay.as_millis()),
            format!("typewriter_interval_ms = {}", interval.as_millis()),
            format!("typewriter_hold_ms = {}", hold.as_millis()),
            "# true: jump straight to link targets instead of animating".to_string(),
            format!("native_scroll = {}", m.native_smooth_scroll),
            String::new(),
            "# Layout".to_string(),
            format!("mobile_breakpoint = {}", self.mobile_breakpoint),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab, BackTab,".to_string(),
            "#   Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/landing-fx/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("landing-fx").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_defaults_match_page_behaviour() {
        let config = AppConfig::default();
        assert_eq!(config.motion.scroll_duration, Duration::from_millis(1000));
        assert_eq!(config.motion.scroll_throttle, Duration::from_millis(16));
        assert_eq!(config.motion.active_offset, 100.0);
        assert!(!config.motion.native_smooth_scroll);
    }

    #[test]
    fn test_ctrl_home_and_escape_are_bound() {
        let config = AppConfig::default();
        assert_eq!(
            config.match_key(key(KeyCode::Home, KeyModifiers::CONTROL)),
            Some(Action::ScrollToTop)
        );
        assert_eq!(config.match_key(key(KeyCode::Home, KeyModifiers::NONE)), None);
        assert_eq!(
            config.match_key(key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(Action::CloseMenu)
        );
    }

    #[test]
    fn test_page_keys_map_to_page_actions() {
        let config = AppConfig::default();
        assert_eq!(
            config.match_key(key(KeyCode::PageUp, KeyModifiers::NONE)),
            Some(Action::PageUp)
        );
        assert_eq!(
            config.match_key(key(KeyCode::PageDown, KeyModifiers::NONE)),
            Some(Action::PageDown)
        );
        assert_eq!(
            config.match_key(key(KeyCode::Char(' '), KeyModifiers::NONE)),
            Some(Action::PageDown)
        );
        for action in Action::ALL {
            assert!(config.bindings.contains_key(action), "{action:?} unbound");
        }
    }

    #[test]
    fn test_parse_settings_and_bindings() {
        let config = AppConfig::parse(
            "# comment\n\
             scroll_duration_ms = 400\n\
             scroll_throttle_ms = 99999\n\
             reveal_threshold = 0.5\n\
             fade_threshold = nonsense\n\
             native_scroll = true\n\
             mobile_breakpoint = 5\n\
             toggle_menu = Ctrl+m, F2\n\
             mystery = 1\n",
        );
        assert_eq!(config.motion.scroll_duration, Duration::from_millis(400));
        assert_eq!(config.motion.scroll_throttle, Duration::from_millis(1000));
        assert_eq!(config.motion.reveal_threshold, 0.5);
        assert_eq!(config.motion.fade_threshold, 0.1);
        assert!(config.motion.native_smooth_scroll);
        assert_eq!(config.mobile_breakpoint, 20);
        assert_eq!(
            config.bindings[&Action::ToggleMenu],
            vec![
                KeyBind::new(KeyCode::Char('m'), KeyModifiers::CONTROL),
                KeyBind::new(KeyCode::F(2), KeyModifiers::NONE),
            ]
        );
    }

    #[test]
    fn test_serialised_config_parses_back() {
        let mut config = AppConfig::default();
        config.motion.header_threshold = 75.0;
        config.bindings.insert(
            Action::Quit,
            vec![KeyBind::new(KeyCode::Char('x'), KeyModifiers::ALT)],
        );
        let reparsed = AppConfig::parse(&config.serialise());
        assert_eq!(reparsed.motion, config.motion);
        assert_eq!(reparsed.bindings, config.bindings);
        assert_eq!(reparsed.mobile_breakpoint, config.mobile_breakpoint);
    }

    #[test]
    fn test_status_bar_hint_uses_first_binding() {
        let hint = AppConfig::default().status_bar_hint();
        assert!(hint.starts_with("↑/↓: scroll"));
        assert!(hint.contains("Ctrl+Home: top"));
    }
}
