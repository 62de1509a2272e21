//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations in `spritz-drivers`.

pub mod motor;
pub mod outputs;
pub mod sensor;

pub use motor::SprayMotor;
pub use outputs::Quiesce;
pub use sensor::{BatterySensor, SensorError};
