//! HBase provider: one concrete instance of the [`corral_core::Provider`]
//! contract, covering a two-role (master/worker) HBase deployment.

pub mod keys;

mod provider;
pub use provider::HBaseProvider;
