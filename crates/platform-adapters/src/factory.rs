use crate::at_door::AtDoorAdapter;
use crate::error::AdapterError;
use crate::megatix::MegatixAdapter;
use crate::resident_advisor::ResidentAdvisorAdapter;
use crate::ticketmelon::TicketmelonAdapter;
use crate::PlatformAdapter;

/// Every platform name the factory can resolve, in display order.
pub fn adapter_names() -> &'static [&'static str] {
    &["Megatix", "Ticketmelon", "Resident Advisor", "At Door"]
}

/// Creates the adapter for a platform by its registered name.
///
/// The name must match the `platforms.name` column exactly; there is no
/// fuzzy matching.
pub fn create_adapter(name: &str) -> Result<Box<dyn PlatformAdapter>, AdapterError> {
    match name {
        "Megatix" => Ok(Box::new(MegatixAdapter::new())),
        "Ticketmelon" => Ok(Box::new(TicketmelonAdapter::new())),
        "Resident Advisor" => Ok(Box::new(ResidentAdvisorAdapter::new())),
        "At Door" => Ok(Box::new(AtDoorAdapter::new())),
        other => Err(AdapterError::UnknownPlatform(other.to_string())),
    }
}
