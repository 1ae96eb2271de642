//! Filterable debug logging for development builds.
//!
//! Categories: ROUTER, VIEW, AUTH, OAUTH, GAME, API
//! Enable via: ?pongdebug=all or localStorage.setItem('pong.debug','router,oauth')
//! Natively: PONG_DEBUG=router,view

use std::sync::atomic::{AtomicU32, Ordering};

pub mod cat {
    pub const ROUTER: u32 = 1 << 0;
    pub const VIEW: u32 = 1 << 1;
    pub const AUTH: u32 = 1 << 2;
    pub const OAUTH: u32 = 1 << 3;
    pub const GAME: u32 = 1 << 4;
    pub const API: u32 = 1 << 5;
    pub const ALL: u32 = 0xffff_ffff;
}

static MASK: AtomicU32 = AtomicU32::new(0);

#[inline]
pub fn mask() -> u32 {
    MASK.load(Ordering::Relaxed)
}

#[inline]
pub fn set(mask: u32) {
    MASK.store(mask, Ordering::Relaxed)
}

#[inline]
pub fn enable(bits: u32) {
    MASK.fetch_or(bits, Ordering::Relaxed);
}

#[inline]
pub fn is(cat: u32) -> bool {
    (MASK.load(Ordering::Relaxed) & cat) != 0
}

#[inline]
pub fn cat_name(cat: u32) -> &'static str {
    match cat {
        c if c == cat::ROUTER => "router",
        c if c == cat::VIEW => "view",
        c if c == cat::AUTH => "auth",
        c if c == cat::OAUTH => "oauth",
        c if c == cat::GAME => "game",
        c if c == cat::API => "api",
        _ => "misc",
    }
}

/// Parse a comma-separated category list into a mask.
pub fn parse_list(list: &str) -> u32 {
    let mut m: u32 = 0;
    for tok in list.split(',').map(|s| s.trim().to_ascii_lowercase()) {
        match tok.as_str() {
            "" | "none" => m = 0,
            "all" => m = cat::ALL,
            "router" => m |= cat::ROUTER,
            "view" => m |= cat::VIEW,
            "auth" => m |= cat::AUTH,
            "oauth" => m |= cat::OAUTH,
            "game" => m |= cat::GAME,
            "api" => m |= cat::API,
            _ => {}
        }
    }
    m
}

#[inline]
pub fn set_from_list(list: &str) {
    set(parse_list(list));
}

#[cfg(target_arch = "wasm32")]
pub fn init_from_url_and_storage_once() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let Some(win) = web_sys::window() else {
            return;
        };
        // URL query: ?pongdebug=router,oauth
        if let Ok(search) = win.location().search() {
            if let Ok(params) = web_sys::UrlSearchParams::new_with_str(&search) {
                if let Some(list) = params.get("pongdebug") {
                    set_from_list(&list);
                }
            }
        }
        // localStorage: pong.debug = "router,oauth"
        if let Ok(Some(storage)) = win.local_storage() {
            if let Ok(Some(v)) = storage.get_item("pong.debug") {
                enable(parse_list(&v));
            }
        }
        log(cat::VIEW, "debug init (wasm) complete");
    });
}

#[cfg(not(target_arch = "wasm32"))]
pub fn init_from_url_and_storage_once() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        if let Ok(list) = std::env::var("PONG_DEBUG") {
            set_from_list(&list);
        }
    });
}

#[inline]
pub fn log(cat: u32, msg: impl AsRef<str>) {
    if !is(cat) {
        return;
    }
    log::info!(target: "pongweb::debug", "[pong][{}] {}", cat_name(cat), msg.as_ref());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_parsing() {
        assert_eq!(parse_list("router, oauth"), cat::ROUTER | cat::OAUTH);
        assert_eq!(parse_list("ALL"), cat::ALL);
        assert_eq!(parse_list("router,none,game"), cat::GAME);
        assert_eq!(parse_list("bogus"), 0);
    }

    #[test]
    fn names_round_trip_through_parse() {
        for c in [cat::ROUTER, cat::VIEW, cat::AUTH, cat::OAUTH, cat::GAME, cat::API] {
            assert_eq!(parse_list(cat_name(c)), c);
        }
    }
}
