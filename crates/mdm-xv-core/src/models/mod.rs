//! Data models for MDM inventory API responses.
//!
//! Every section of a computer record is optional because the inventory
//! endpoint only returns the sections named in the request.

pub mod computer;

pub use computer::{
    Computer, ComputerInventoryResponse, DiskEncryption, General, Hardware, OperatingSystem,
    RemoteManagement, UserAndLocation,
};
