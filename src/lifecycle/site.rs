// ABOUTME: Generic site struct parameterized by lifecycle state marker.
// ABOUTME: Transitions consume the site, so a step can't be skipped or repeated.

use crate::error::Result;
use crate::site::SiteRecord;
use crate::types::HostName;

use super::state::Requested;

/// A site moving through the create flow, parameterized by its current state.
///
/// The state type `S` carries what earlier steps produced (the recognized
/// kind, the rendered artifact, the written path), so later steps can only
/// be reached with that data in hand.
#[derive(Debug)]
pub struct Site<S> {
    pub(crate) record: SiteRecord,
    pub(crate) host: HostName,
    pub(crate) state: S,
}

impl Site<Requested> {
    /// Start the flow for a record.
    ///
    /// # Errors
    ///
    /// Returns `Error::ValidationFailed` if no usable host name can be
    /// derived from the site name; without one there is no file to write.
    pub fn new(record: SiteRecord) -> Result<Self> {
        let host = HostName::new(record.site_host_name())?;
        Ok(Site {
            record,
            host,
            state: Requested,
        })
    }
}

impl<S> Site<S> {
    pub fn record(&self) -> &SiteRecord {
        &self.record
    }

    pub fn host(&self) -> &HostName {
        &self.host
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub(crate) fn transition<T>(self, state: T) -> Site<T> {
        Site {
            record: self.record,
            host: self.host,
            state,
        }
    }
}
