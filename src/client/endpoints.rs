use super::AlphaEssClient;
use crate::error::Result;
use chrono::NaiveDate;
use serde_json::Value;

/// Endpoint paths relative to the API base URL
pub mod paths {
    pub const ESS_LIST: &str = "/getEssList";
    pub const LAST_POWER_DATA: &str = "/getLastPowerData";
    pub const ONE_DAY_POWER: &str = "/getOneDayPowerBySn";
    pub const SUM_DATA: &str = "/getSumDataForCustomer";
    pub const ONE_DATE_ENERGY: &str = "/getOneDateEnergyBySn";
    pub const CHARGE_CONFIG: &str = "/getChargeConfigInfo";
    pub const DISCHARGE_CONFIG: &str = "/getDisChargeConfigInfo";
    pub const UPDATE_CHARGE_CONFIG: &str = "/updateChargeConfigInfo";
    pub const UPDATE_DISCHARGE_CONFIG: &str = "/updateDisChargeConfigInfo";
}

const QUERY_DATE_FORMAT: &str = "%Y-%m-%d";

impl AlphaEssClient {
    /// List the systems bound to this application ID
    pub async fn get_ess_list(&self) -> Result<Option<Value>> {
        self.get(paths::ESS_LIST, &[]).await
    }

    /// Real-time power snapshot
    pub async fn get_last_power_data(&self, sys_sn: &str) -> Result<Option<Value>> {
        self.get(paths::LAST_POWER_DATA, &[("sysSn", sys_sn)]).await
    }

    /// Intraday power series. The API only serves the current day, so the
    /// request always uses today's date whatever `query_date` says.
    pub async fn get_one_day_power_by_sn(
        &self,
        sys_sn: &str,
        query_date: NaiveDate,
    ) -> Result<Option<Value>> {
        let date = self.effective_query_date(paths::ONE_DAY_POWER, query_date);
        self.get(paths::ONE_DAY_POWER, &[("sysSn", sys_sn), ("queryDate", date.as_str())])
            .await
    }

    /// Cumulative summary data
    pub async fn get_sum_data_for_customer(&self, sys_sn: &str) -> Result<Option<Value>> {
        self.get(paths::SUM_DATA, &[("sysSn", sys_sn)]).await
    }

    /// Daily energy totals, with the same date forcing as the power curve
    pub async fn get_one_date_energy_by_sn(
        &self,
        sys_sn: &str,
        query_date: NaiveDate,
    ) -> Result<Option<Value>> {
        let date = self.effective_query_date(paths::ONE_DATE_ENERGY, query_date);
        self.get(paths::ONE_DATE_ENERGY, &[("sysSn", sys_sn), ("queryDate", date.as_str())])
            .await
    }

    /// Current charging schedule and limits
    pub async fn get_charge_config_info(&self, sys_sn: &str) -> Result<Option<Value>> {
        self.get(paths::CHARGE_CONFIG, &[("sysSn", sys_sn)]).await
    }

    /// Current discharging schedule and limits
    pub async fn get_dis_charge_config_info(&self, sys_sn: &str) -> Result<Option<Value>> {
        self.get(paths::DISCHARGE_CONFIG, &[("sysSn", sys_sn)]).await
    }

    fn effective_query_date(&self, path: &str, requested: NaiveDate) -> String {
        let today = self.local_today();
        if requested != today {
            self.logger.debug(&format!(
                "Adjusted queryDate {} to {} for {}",
                requested, today, path
            ));
        }
        today.format(QUERY_DATE_FORMAT).to_string()
    }
}
