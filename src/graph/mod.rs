//! Kern datastructuren voor waarden en componentinstanties.

pub mod node;
pub mod value;
