use super::AlphaEssClient;
use crate::aggregator::serial_of;
use crate::error::Result;

impl AlphaEssClient {
    /// Probe the credentials by listing systems.
    ///
    /// Returns `Ok(true)` when the list holds at least one entry with a
    /// `sysSn`. An empty or unusable list is `Ok(false)`; connection and
    /// HTTP failures are returned as errors.
    pub async fn authenticate(&self) -> Result<bool> {
        let units = self.get_ess_list().await?;
        let found = units
            .as_ref()
            .and_then(|u| u.as_array())
            .map(|list| list.iter().filter(|u| serial_of(u).is_some()).count())
            .unwrap_or(0);

        if found > 0 {
            self.logger
                .info(&format!("Authenticated, {} system(s) visible", found));
            Ok(true)
        } else {
            self.logger
                .warn("Authentication probe returned no systems");
            Ok(false)
        }
    }
}
