mod machine;

pub use machine::{ParkourInput, ParkourMachine, ParkourSettings};
