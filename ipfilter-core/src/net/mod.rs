pub mod client_ip;
pub mod private_address;


pub use client_ip::resolve_client_ip;
pub use private_address::{AddressClassifier, PrivateAddressClassifier};
