//! Pixel settings for the admin settings page.
//!
//! Only the decision logic lives here: reading and writing the stored
//! settings, sanitizing a submitted form, and deciding whether the
//! "pixel id not set" notice is shown. Rendering is left to the host.
//!
//! Storage goes through two explicit collaborators instead of global option
//! tables: [`OptionStore`] for site-wide options and [`UserMetaStore`] for
//! per-user flags.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use commerce_graph::settings::{sanitize_input, MemoryOptionStore, PixelSettings, USE_PII_KEY};
//!
//! let mut form = HashMap::new();
//! form.insert("pixel_id".to_string(), "1234567890".to_string());
//! form.insert(USE_PII_KEY.to_string(), "on".to_string());
//!
//! let store = MemoryOptionStore::default();
//! PixelSettings::from_form(&sanitize_input(form)).save(&store);
//!
//! let settings = PixelSettings::load(&store);
//! assert_eq!(settings.pixel_id.as_deref(), Some("1234567890"));
//! assert!(!settings.use_pii);
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// Option name the pixel settings are stored under.
pub const SETTINGS_KEY: &str = "facebook_config";
/// Form/option field holding the pixel id.
pub const PIXEL_ID_KEY: &str = "pixel_id";
/// Form/option field holding the advanced-matching flag.
pub const USE_PII_KEY: &str = "use_pii";
/// Slug of the settings page.
pub const MENU_SLUG: &str = "facebook_pixel_options";
/// User meta flag set once the notice has been dismissed.
pub const IGNORE_PIXEL_ID_NOTICE: &str = "ignore_pixel_id_notice";
/// Query parameter that dismisses the notice.
pub const DISMISS_PIXEL_ID_NOTICE: &str = "dismiss_pixel_id_notice";

/// Site-wide key-value option storage.
pub trait OptionStore: Send + Sync {
    /// Returns the stored value for `name`.
    fn get_option(&self, name: &str) -> Option<serde_json::Value>;

    /// Stores `value` under `name`.
    fn update_option(&self, name: &str, value: serde_json::Value);
}

/// Per-user flag storage.
pub trait UserMetaStore: Send + Sync {
    /// Returns `true` if `key` is set for `user_id`.
    fn get_user_flag(&self, user_id: u64, key: &str) -> bool;

    /// Sets `key` for `user_id`.
    fn set_user_flag(&self, user_id: u64, key: &str);
}

/// In-memory [`OptionStore`] and [`UserMetaStore`].
#[derive(Debug, Default)]
pub struct MemoryOptionStore {
    options: RwLock<HashMap<String, serde_json::Value>>,
    user_flags: RwLock<HashSet<(u64, String)>>,
}

impl OptionStore for MemoryOptionStore {
    fn get_option(&self, name: &str) -> Option<serde_json::Value> {
        self.options
            .read()
            .ok()
            .and_then(|options| options.get(name).cloned())
    }

    fn update_option(&self, name: &str, value: serde_json::Value) {
        if let Ok(mut options) = self.options.write() {
            options.insert(name.to_string(), value);
        }
    }
}

impl UserMetaStore for MemoryOptionStore {
    fn get_user_flag(&self, user_id: u64, key: &str) -> bool {
        self.user_flags
            .read()
            .map(|flags| flags.contains(&(user_id, key.to_string())))
            .unwrap_or(false)
    }

    fn set_user_flag(&self, user_id: u64, key: &str) {
        if let Ok(mut flags) = self.user_flags.write() {
            flags.insert((user_id, key.to_string()));
        }
    }
}

/// Stored pixel settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelSettings {
    /// The Facebook pixel id, if one was entered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_id: Option<String>,
    /// Whether advanced matching is enabled.
    #[serde(default, with = "flag")]
    pub use_pii: bool,
}

impl PixelSettings {
    /// Loads the settings, falling back to defaults if none are stored or
    /// the stored value is unreadable.
    #[must_use]
    pub fn load(store: &dyn OptionStore) -> Self {
        store
            .get_option(SETTINGS_KEY)
            .and_then(|value| match serde_json::from_value(value) {
                Ok(settings) => Some(settings),
                Err(error) => {
                    tracing::warn!("Ignoring unreadable pixel settings: {error}");
                    None
                }
            })
            .unwrap_or_default()
    }

    /// Saves the settings.
    pub fn save(&self, store: &dyn OptionStore) {
        match serde_json::to_value(self) {
            Ok(value) => store.update_option(SETTINGS_KEY, value),
            Err(error) => tracing::warn!("Cannot store pixel settings: {error}"),
        }
    }

    /// Builds settings from a sanitized form submission.
    #[must_use]
    pub fn from_form(form: &HashMap<String, String>) -> Self {
        Self {
            pixel_id: form
                .get(PIXEL_ID_KEY)
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
            use_pii: form.get(USE_PII_KEY).is_some_and(|v| v == "1"),
        }
    }

    /// Returns `true` if a valid pixel id is configured.
    #[must_use]
    pub fn has_valid_pixel_id(&self) -> bool {
        self.pixel_id.as_deref().is_some_and(is_valid_id)
    }
}

/// Normalizes a submitted settings form: `use_pii` becomes `"1"` if it was
/// submitted as `"1"` and `"0"` otherwise. Other fields pass through.
#[must_use]
pub fn sanitize_input(mut input: HashMap<String, String>) -> HashMap<String, String> {
    let enabled = input.get(USE_PII_KEY).is_some_and(|v| v.trim() == "1");
    input.insert(
        USE_PII_KEY.to_string(),
        if enabled { "1" } else { "0" }.to_string(),
    );
    input
}

/// Returns `true` for a non-empty, all-digit Graph id.
#[must_use]
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_digit())
}

/// The admin request a notice decision is made for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoticeContext<'a> {
    /// Current user.
    pub user_id: u64,
    /// Whether the user may manage options.
    pub can_manage_options: bool,
    /// Id of the admin screen being rendered.
    pub screen_id: &'a str,
    /// Id of the settings page screen, if it has been registered.
    pub settings_screen_id: Option<&'a str>,
}

/// Decides whether to show the "pixel id not set" notice.
///
/// Shown only when the stored pixel id is missing or invalid, the user can
/// manage options, the screen is the dashboard, the plugins list or the
/// settings page, and the user has not dismissed the notice.
#[must_use]
pub fn should_show_pixel_id_notice(
    settings: &PixelSettings,
    ctx: &NoticeContext<'_>,
    user_meta: &dyn UserMetaStore,
) -> bool {
    let on_relevant_screen = matches!(ctx.screen_id, "dashboard" | "plugins")
        || ctx.settings_screen_id == Some(ctx.screen_id);

    !settings.has_valid_pixel_id()
        && ctx.can_manage_options
        && on_relevant_screen
        && !user_meta.get_user_flag(ctx.user_id, IGNORE_PIXEL_ID_NOTICE)
}

/// Records a dismissal if the request's query carries the dismiss parameter.
///
/// Returns `true` if the notice was dismissed.
pub fn dismiss_pixel_id_notice(
    query: &HashMap<String, String>,
    user_id: u64,
    user_meta: &dyn UserMetaStore,
) -> bool {
    if !query.contains_key(DISMISS_PIXEL_ID_NOTICE) {
        return false;
    }
    user_meta.set_user_flag(user_id, IGNORE_PIXEL_ID_NOTICE);
    true
}

/// Stores booleans as the `"1"` / `"0"` strings the settings form posts.
mod flag {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(if *value { "1" } else { "0" })
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Ok(s == "1"),
            serde_json::Value::Bool(b) => Ok(b),
            serde_json::Value::Number(n) => Ok(n.as_u64() == Some(1)),
            serde_json::Value::Null => Ok(false),
            other => Err(de::Error::custom(format!("invalid flag value {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn admin_on(screen_id: &str) -> NoticeContext<'_> {
        NoticeContext {
            user_id: 1,
            can_manage_options: true,
            screen_id,
            settings_screen_id: Some("settings_page_facebook_pixel_options"),
        }
    }

    #[test]
    fn test_sanitize_normalizes_use_pii() {
        assert_eq!(sanitize_input(form(&[(USE_PII_KEY, "1")]))[USE_PII_KEY], "1");
        assert_eq!(sanitize_input(form(&[(USE_PII_KEY, "on")]))[USE_PII_KEY], "0");
        assert_eq!(sanitize_input(form(&[]))[USE_PII_KEY], "0");
    }

    #[test]
    fn test_sanitize_keeps_other_fields() {
        let sanitized = sanitize_input(form(&[(PIXEL_ID_KEY, "42"), ("extra", "x")]));
        assert_eq!(sanitized[PIXEL_ID_KEY], "42");
        assert_eq!(sanitized["extra"], "x");
    }

    #[test]
    fn test_is_valid_id() {
        assert!(is_valid_id("1234567890"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("12a4"));
        assert!(!is_valid_id(" 123"));
    }

    #[test]
    fn test_settings_round_trip_through_store() {
        let store = MemoryOptionStore::default();
        let settings = PixelSettings {
            pixel_id: Some("123".to_string()),
            use_pii: true,
        };
        settings.save(&store);

        assert_eq!(
            store.get_option(SETTINGS_KEY),
            Some(json!({"pixel_id": "123", "use_pii": "1"}))
        );
        assert_eq!(PixelSettings::load(&store), settings);
    }

    #[test]
    fn test_load_defaults_when_missing_or_unreadable() {
        let store = MemoryOptionStore::default();
        assert_eq!(PixelSettings::load(&store), PixelSettings::default());

        store.update_option(SETTINGS_KEY, json!("garbage"));
        assert_eq!(PixelSettings::load(&store), PixelSettings::default());
    }

    #[test]
    fn test_from_form_drops_blank_pixel_id() {
        let settings = PixelSettings::from_form(&form(&[(PIXEL_ID_KEY, "  "), (USE_PII_KEY, "1")]));
        assert!(settings.pixel_id.is_none());
        assert!(settings.use_pii);
    }

    #[test]
    fn test_notice_shown_for_admin_without_pixel_id() {
        let store = MemoryOptionStore::default();
        let settings = PixelSettings::default();

        assert!(should_show_pixel_id_notice(&settings, &admin_on("dashboard"), &store));
        assert!(should_show_pixel_id_notice(&settings, &admin_on("plugins"), &store));
        assert!(should_show_pixel_id_notice(
            &settings,
            &admin_on("settings_page_facebook_pixel_options"),
            &store
        ));
        assert!(!should_show_pixel_id_notice(&settings, &admin_on("edit-post"), &store));
    }

    #[test]
    fn test_notice_hidden_when_pixel_id_valid_or_not_admin() {
        let store = MemoryOptionStore::default();
        let configured = PixelSettings {
            pixel_id: Some("1234".to_string()),
            use_pii: false,
        };
        assert!(!should_show_pixel_id_notice(&configured, &admin_on("dashboard"), &store));

        let mut ctx = admin_on("dashboard");
        ctx.can_manage_options = false;
        assert!(!should_show_pixel_id_notice(&PixelSettings::default(), &ctx, &store));
    }

    #[test]
    fn test_dismissal_hides_notice_for_that_user_only() {
        let store = MemoryOptionStore::default();
        let settings = PixelSettings::default();

        assert!(!dismiss_pixel_id_notice(&HashMap::new(), 1, &store));
        assert!(dismiss_pixel_id_notice(
            &form(&[(DISMISS_PIXEL_ID_NOTICE, "")]),
            1,
            &store
        ));

        assert!(!should_show_pixel_id_notice(&settings, &admin_on("dashboard"), &store));
        let mut other_user = admin_on("dashboard");
        other_user.user_id = 2;
        assert!(should_show_pixel_id_notice(&settings, &other_user, &store));
    }
}
