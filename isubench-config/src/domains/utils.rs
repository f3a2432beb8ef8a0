//! Default helpers shared by domain configs

pub fn default_true() -> bool {
    true
}

pub fn default_false() -> bool {
    false
}
