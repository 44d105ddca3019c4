pub mod pharmacokinetics;
pub mod clinical;
pub mod dosage;
pub mod physical;

pub use pharmacokinetics::*;
pub use clinical::*;
pub use dosage::*;
pub use physical::*;
