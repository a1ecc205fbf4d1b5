//! Known preference table
//!
//! A small database of preferences commonly found in override files, with the
//! value kind the browser expects and a short explanation. The linter uses it
//! to catch type mistakes such as `browser.startup.page` written as a string;
//! keys missing from the table are not checked.

use crate::types::ValueKind;
use crate::types::ValueKind::{Bool, Integer, String as Text};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Expected kind and explanation for a preference key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KnownPref {
    pub key: &'static str,
    pub kind: ValueKind,
    pub explanation: &'static str,
}

const fn known(key: &'static str, kind: ValueKind, explanation: &'static str) -> KnownPref {
    KnownPref {
        key,
        kind,
        explanation,
    }
}

// Keep sorted by key.
const KNOWN_PREFS: &[KnownPref] = &[
    known(
        "accessibility.force_disabled",
        Integer,
        "Accessibility services: 0 lets them start on demand, 1 blocks them entirely, \
         -1 always enables them. Blocking them breaks screen readers.",
    ),
    known(
        "accessibility.typeaheadfind",
        Bool,
        "When true, typing anywhere on a page starts a find-as-you-type search.",
    ),
    known(
        "app.update.suppressPrompts",
        Bool,
        "When true, update notifications are shown less prominently.",
    ),
    known(
        "browser.cache.memory.capacity",
        Integer,
        "Memory cache size in KiB. -1 lets the browser size it from available RAM.",
    ),
    known(
        "browser.contentblocking.category",
        Text,
        "Enhanced Tracking Protection mode: \"standard\", \"strict\" or \"custom\".",
    ),
    known(
        "browser.download.useDownloadDir",
        Bool,
        "When true, downloads are saved to the default folder without asking where.",
    ),
    known(
        "browser.formfill.enable",
        Bool,
        "When true, the browser remembers search and form history.",
    ),
    known(
        "browser.ml.chat.enabled",
        Bool,
        "Enables the AI chatbot integration in the sidebar.",
    ),
    known(
        "browser.ml.enable",
        Bool,
        "Master switch for local machine-learning features.",
    ),
    known(
        "browser.newtabpage.enabled",
        Bool,
        "When false, new tabs open as a blank page instead of Firefox Home.",
    ),
    known(
        "browser.search.suggest.enabled",
        Bool,
        "When true, the search engine is asked for suggestions while typing.",
    ),
    known(
        "browser.sessionstore.interval",
        Integer,
        "Milliseconds between session state saves. Default 15000.",
    ),
    known(
        "browser.sessionstore.resume_from_crash",
        Bool,
        "When true, the previous session is restored automatically after a crash.",
    ),
    known(
        "browser.shell.checkDefaultBrowser",
        Bool,
        "When true, the browser asks at startup to become the default browser.",
    ),
    known(
        "browser.startup.homepage",
        Text,
        "Page(s) opened as home. Several URLs are separated with '|'.",
    ),
    known(
        "browser.startup.page",
        Integer,
        "What to show at startup: 0 blank page, 1 home page, 3 resume previous session.",
    ),
    known(
        "browser.tabs.closeWindowWithLastTab",
        Bool,
        "When true, closing the last tab closes the window.",
    ),
    known(
        "browser.toolbars.bookmarks.visibility",
        Text,
        "Bookmarks toolbar visibility: \"always\", \"never\" or \"newtab\".",
    ),
    known(
        "browser.uiCustomization.state",
        Text,
        "JSON document describing the toolbar layout.",
    ),
    known(
        "browser.uidensity",
        Integer,
        "Toolbar density: 0 normal, 1 compact, 2 touch.",
    ),
    known(
        "browser.urlbar.suggest.searches",
        Bool,
        "When true, search suggestions appear in the address bar dropdown.",
    ),
    known(
        "content.notify.interval",
        Integer,
        "Microseconds between page reflows while content is loading.",
    ),
    known(
        "cookiebanners.service.mode",
        Integer,
        "Cookie banner handling: 0 off, 1 reject, 2 reject or accept.",
    ),
    known(
        "datareporting.healthreport.uploadEnabled",
        Bool,
        "When true, technical and interaction data is sent to Mozilla.",
    ),
    known(
        "devtools.chrome.enabled",
        Bool,
        "When true, developer tools can debug the browser's own UI.",
    ),
    known(
        "devtools.theme",
        Text,
        "Developer tools theme: \"auto\", \"light\" or \"dark\".",
    ),
    known(
        "dom.security.https_only_mode",
        Bool,
        "When true, every connection is upgraded to HTTPS.",
    ),
    known(
        "full-screen-api.transition-duration.enter",
        Text,
        "Two space-separated durations in ms for the fullscreen enter animation.",
    ),
    known(
        "full-screen-api.transition-duration.leave",
        Text,
        "Two space-separated durations in ms for the fullscreen leave animation.",
    ),
    known(
        "general.autoScroll",
        Bool,
        "When true, middle-click starts autoscrolling.",
    ),
    known(
        "general.smoothScroll",
        Bool,
        "When true, scrolling is animated.",
    ),
    known(
        "javascript.options.baselinejit",
        Bool,
        "Enables the baseline JavaScript JIT compiler.",
    ),
    known(
        "javascript.options.ion",
        Bool,
        "Enables the optimizing Ion JavaScript JIT compiler.",
    ),
    known(
        "media.eme.enabled",
        Bool,
        "When true, DRM-protected media (Encrypted Media Extensions) can play.",
    ),
    known(
        "network.dnsCacheExpiration",
        Integer,
        "Seconds a DNS answer stays cached. Default 60.",
    ),
    known(
        "network.http.max-connections",
        Integer,
        "Maximum number of simultaneous HTTP connections.",
    ),
    known(
        "network.http.max-persistent-connections-per-server",
        Integer,
        "Maximum keep-alive connections to a single server.",
    ),
    known(
        "network.trr.mode",
        Integer,
        "DNS over HTTPS: 0 off, 2 DoH first, 3 DoH only, 5 explicitly disabled.",
    ),
    known(
        "network.trr.uri",
        Text,
        "Resolver URL used for DNS over HTTPS.",
    ),
    known(
        "privacy.clearOnShutdown_v2.cookiesAndStorage",
        Bool,
        "When true and sanitizing on shutdown, cookies and site data are deleted.",
    ),
    known(
        "privacy.resistFingerprinting",
        Bool,
        "When true, many browser characteristics are normalized to resist fingerprinting.",
    ),
    known(
        "privacy.resistFingerprinting.exemptedDomains",
        Text,
        "Comma-separated domain patterns excluded from fingerprinting resistance.",
    ),
    known(
        "privacy.sanitize.sanitizeOnShutdown",
        Bool,
        "When true, the data selected in the clearOnShutdown prefs is wiped at exit.",
    ),
    known(
        "security.OCSP.require",
        Bool,
        "When true, a failed OCSP check makes the certificate invalid (hard-fail).",
    ),
    known(
        "security.cert_pinning.enforcement_level",
        Integer,
        "Certificate pinning: 0 off, 1 allow user MITM, 2 strict.",
    ),
    known(
        "security.ssl.require_safe_negotiation",
        Bool,
        "When true, servers without RFC 5746 safe renegotiation are refused.",
    ),
    known(
        "sidebar.revamp",
        Bool,
        "Enables the redesigned sidebar.",
    ),
    known(
        "sidebar.verticalTabs",
        Bool,
        "When true, tabs are listed vertically in the sidebar.",
    ),
    known(
        "webgl.disabled",
        Bool,
        "When true, WebGL is unavailable to web content.",
    ),
];

static PREF_INDEX: OnceLock<HashMap<&'static str, &'static KnownPref>> = OnceLock::new();

/// Look up the expected kind and explanation for `key`
pub fn known_pref(key: &str) -> Option<&'static KnownPref> {
    PREF_INDEX
        .get_or_init(|| KNOWN_PREFS.iter().map(|p| (p.key, p)).collect())
        .get(key)
        .copied()
}

/// All known preferences, sorted by key
pub fn known_prefs() -> &'static [KnownPref] {
    KNOWN_PREFS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_page_is_integer() {
        let pref = known_pref("browser.startup.page").unwrap();
        assert_eq!(pref.kind, ValueKind::Integer);
        assert!(pref.explanation.contains("resume previous session"));
    }

    #[test]
    fn test_unknown_key() {
        assert!(known_pref("no.such.pref").is_none());
    }

    #[test]
    fn test_table_sorted_and_unique() {
        let keys: Vec<&str> = known_prefs().iter().map(|p| p.key).collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_explanations_are_present() {
        for pref in known_prefs() {
            assert!(!pref.explanation.is_empty(), "{} has no explanation", pref.key);
        }
    }
}
