/**
 * Route Guards
 *
 * Decides what a front end should do when navigating to a page.
 */
use crate::client::session::SessionState;

/// Who may see a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Signed-in users only
    Protected,
    /// Signed-out users only, e.g. login and register
    GuestOnly,
    Public,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render,
    /// Session check still running; show a spinner
    Wait,
    RedirectToLogin,
    RedirectToHome,
}

pub fn guard(access: RouteAccess, session: &SessionState) -> Navigation {
    if access != RouteAccess::Public && session.loading {
        return Navigation::Wait;
    }
    match (access, session.is_authenticated()) {
        (RouteAccess::Protected, false) => Navigation::RedirectToLogin,
        (RouteAccess::GuestOnly, true) => Navigation::RedirectToHome,
        _ => Navigation::Render,
    }
}
