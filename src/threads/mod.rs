pub mod check_predecessor;
pub mod chord;
pub mod commands;
pub mod fix_fingers;
pub mod join;
pub mod stabilize;
