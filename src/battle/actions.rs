//! Semantic action IDs for click targets.

// ── Combat controls ───────────────────────────────────────────
pub const ATTACK: u16 = 10;
pub const FIREBALL: u16 = 11;
pub const HEAL: u16 = 12;

// ── After the battle ──────────────────────────────────────────
/// "Continue Deeper" or "Resurrect", whichever is shown.
pub const CONTINUE: u16 = 20;
