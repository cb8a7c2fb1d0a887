//! Navigation guard: maps a `Session` to the screens the user may reach.
//!
//! The decision is a pure function of the session. The navigation layer
//! re-evaluates it whenever the session store publishes a change.

use serde::{Deserialize, Serialize};

#[cfg(feature = "ts")]
use ts_rs::TS;

use crate::auth::Session;

// ============================================================================
// Routes
// ============================================================================

/// Tabs inside the authenticated main screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub enum MainTab {
    Dashboard,
    Profile,
}

impl MainTab {
    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            MainTab::Dashboard => "Documents",
            MainTab::Profile => "Profile",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            MainTab::Dashboard => MainTab::Profile,
            MainTab::Profile => MainTab::Dashboard,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        // Two tabs: previous and next coincide
        self.next()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub enum Route {
    Login,
    Signup,
    Main(MainTab),
    DocumentDetail,
}

impl Route {
    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Sign in",
            Route::Signup => "Create Account",
            Route::Main(tab) => tab.title(),
            Route::DocumentDetail => "Document Details",
        }
    }
}

const AUTH_ROUTES: [Route; 2] = [Route::Login, Route::Signup];

const APP_ROUTES: [Route; 3] = [
    Route::Main(MainTab::Dashboard),
    Route::Main(MainTab::Profile),
    Route::DocumentDetail,
];

// ============================================================================
// Decision
// ============================================================================

/// Screen group mounted by the navigator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub enum ScreenGroup {
    Loading,
    Auth,
    App,
}

/// Animation used when the login screen replaces the app screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub enum Transition {
    /// Forward animation (first launch)
    Push,
    /// Reverse animation (right after signing out)
    Pop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub enum NavigationDecision {
    /// Stored token not read yet; show a blocking indicator
    Loading,
    Unauthenticated { transition: Transition },
    Authenticated,
}

impl NavigationDecision {
    pub fn screen_group(&self) -> ScreenGroup {
        match self {
            NavigationDecision::Loading => ScreenGroup::Loading,
            NavigationDecision::Unauthenticated { .. } => ScreenGroup::Auth,
            NavigationDecision::Authenticated => ScreenGroup::App,
        }
    }

    pub fn reachable_routes(&self) -> &'static [Route] {
        match self {
            NavigationDecision::Loading => &[],
            NavigationDecision::Unauthenticated { .. } => &AUTH_ROUTES,
            NavigationDecision::Authenticated => &APP_ROUTES,
        }
    }

    pub fn is_reachable(&self, route: Route) -> bool {
        self.reachable_routes().contains(&route)
    }

    /// First screen shown when this group is mounted
    pub fn initial_route(&self) -> Option<Route> {
        self.reachable_routes().first().copied()
    }
}

/// Decide which screens are reachable for `session`
pub fn decide(session: &Session) -> NavigationDecision {
    if session.loading {
        return NavigationDecision::Loading;
    }

    match session.token {
        None => NavigationDecision::Unauthenticated {
            transition: if session.just_signed_out {
                Transition::Pop
            } else {
                Transition::Push
            },
        },
        Some(_) => NavigationDecision::Authenticated,
    }
}

// ============================================================================
// Tests
// ============================================================================
