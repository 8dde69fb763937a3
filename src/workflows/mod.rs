pub mod lookup;
pub mod matcher;
pub mod naming;
pub mod renamer;
