//! Element selectors of the two sites a run drives.

/// The page a game is relayed from.
pub mod source {
    /// Viewed player's name, first present wins
    pub const PLAYER_NAME: [&str; 2] = [
        ".user-username-component",
        "[data-test-element=\"user-tagline-username\"]",
    ];
    pub const IDENTITY: &str = "#notifications-request";
    pub const IDENTITY_ATTRIBUTE: &str = "username";
    pub const LOADING: &str = ".cal-loading";

    pub const SHARE: &str = ".share";
    pub const SHARE_PGN_TAB: &str = ".board-tab-item-underlined-component";
    pub const SHARE_PGN_TOGGLE: &str = ".share-menu-tab-pgn-toggle";
    pub const SHARE_PGN_TOGGLE_INPUT: &str = ".share-menu-tab-pgn-toggle input";
    pub const PGN_FIELD: &str = "[name='pgn']";
    pub const SHARE_CLOSE: &str = ".ui_outside-close-component";
}

/// The analysis page a game is relayed to.
pub mod target {
    /// Enabled only when an account is logged in
    pub const USE_ACCOUNT: &str = "[name='analyse']";
    pub const PGN_INPUT: &str = "[name='pgn']";
    pub const SUBMIT: &str = ".submit";
    pub const EVAL_TOGGLE: &str = "#analyse-toggle-ceval";
    pub const EVAL_TOGGLE_LABEL: &str = "[for='analyse-toggle-ceval']";
}
