//! Charge and discharge schedule updates
//!
//! The write endpoints take a flat JSON object with fixed field names. Each
//! schedule has two time windows; in the field names `f` marks a window start
//! and `e` a window end (`timeChaf1` starts window 1, `timeChae1` ends it).

use crate::client::{AlphaEssClient, paths};
use crate::error::{AlphaEssError, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const TIME_FORMAT: &str = "%H:%M";

/// A start/end pair in `HH:MM`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: String,
    pub end: String,
}

impl TimeWindow {
    pub fn new<S: Into<String>, E: Into<String>>(start: S, end: E) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// `00:00`-`00:00`, which the API treats as an unused window
    pub fn disabled() -> Self {
        Self::new("00:00", "00:00")
    }

    fn validate(&self, field: &str) -> Result<()> {
        for (edge, value) in [("start", &self.start), ("end", &self.end)] {
            NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|_| {
                AlphaEssError::validation(
                    format!("{}.{}", field, edge),
                    format!("'{}' is not a HH:MM time", value),
                )
            })?;
        }
        Ok(())
    }
}

fn validate_soc(field: &str, soc: u8) -> Result<()> {
    if soc > 100 {
        return Err(AlphaEssError::validation(
            field.to_string(),
            format!("{} is outside 0-100", soc),
        ));
    }
    Ok(())
}

/// Body of `/updateChargeConfigInfo`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeSettings {
    pub sys_sn: String,
    /// Stop grid charging at this state of charge (%)
    pub bat_high_cap: u8,
    /// 1 enables grid charging, 0 disables it
    pub grid_charge: u8,
    pub time_chae1: String,
    pub time_chae2: String,
    pub time_chaf1: String,
    pub time_chaf2: String,
}

impl ChargeSettings {
    pub fn new(
        sys_sn: &str,
        enabled: bool,
        window1: &TimeWindow,
        window2: &TimeWindow,
        charge_stop_soc: u8,
    ) -> Self {
        Self {
            sys_sn: sys_sn.to_string(),
            bat_high_cap: charge_stop_soc,
            grid_charge: u8::from(enabled),
            time_chae1: window1.end.clone(),
            time_chae2: window2.end.clone(),
            time_chaf1: window1.start.clone(),
            time_chaf2: window2.start.clone(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sys_sn.trim().is_empty() {
            return Err(AlphaEssError::validation("sysSn", "Serial cannot be empty"));
        }
        validate_soc("batHighCap", self.bat_high_cap)?;
        TimeWindow::new(self.time_chaf1.clone(), self.time_chae1.clone()).validate("window1")?;
        TimeWindow::new(self.time_chaf2.clone(), self.time_chae2.clone()).validate("window2")
    }
}

/// Body of `/updateDisChargeConfigInfo`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DischargeSettings {
    pub sys_sn: String,
    /// Stop discharging at this state of charge (%)
    pub bat_use_cap: u8,
    /// 1 enables time-controlled discharge, 0 disables it
    pub ctr_dis: u8,
    pub time_dise1: String,
    pub time_dise2: String,
    pub time_disf1: String,
    pub time_disf2: String,
}

impl DischargeSettings {
    pub fn new(
        sys_sn: &str,
        enabled: bool,
        window1: &TimeWindow,
        window2: &TimeWindow,
        discharge_cutoff_soc: u8,
    ) -> Self {
        Self {
            sys_sn: sys_sn.to_string(),
            bat_use_cap: discharge_cutoff_soc,
            ctr_dis: u8::from(enabled),
            time_dise1: window1.end.clone(),
            time_dise2: window2.end.clone(),
            time_disf1: window1.start.clone(),
            time_disf2: window2.start.clone(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sys_sn.trim().is_empty() {
            return Err(AlphaEssError::validation("sysSn", "Serial cannot be empty"));
        }
        validate_soc("batUseCap", self.bat_use_cap)?;
        TimeWindow::new(self.time_disf1.clone(), self.time_dise1.clone()).validate("window1")?;
        TimeWindow::new(self.time_disf2.clone(), self.time_dise2.clone()).validate("window2")
    }
}

impl AlphaEssClient {
    /// Submit a charge configuration as given
    pub async fn update_charge_config_info(&self, settings: &ChargeSettings) -> Result<Option<Value>> {
        self.logger().debug(&format!(
            "Trying to call {} with settings {:?}",
            paths::UPDATE_CHARGE_CONFIG,
            settings
        ));
        self.post(paths::UPDATE_CHARGE_CONFIG, settings).await
    }

    /// Submit a discharge configuration as given
    pub async fn update_dis_charge_config_info(
        &self,
        settings: &DischargeSettings,
    ) -> Result<Option<Value>> {
        self.logger().debug(&format!(
            "Trying to call {} with settings {:?}",
            paths::UPDATE_DISCHARGE_CONFIG,
            settings
        ));
        self.post(paths::UPDATE_DISCHARGE_CONFIG, settings).await
    }

    /// Configure grid charging for a system.
    ///
    /// Inputs are validated before anything is sent. A returned `Ok` only
    /// means the request was accepted by the transport; the API rarely sends
    /// a payload back for writes.
    ///
    /// # Arguments
    ///
    /// * `serial` - system serial number
    /// * `enabled` - whether grid charging is allowed
    /// * `window1` / `window2` - charging periods
    /// * `charge_stop_soc` - stop charging at this state of charge (%)
    pub async fn set_battery_charge(
        &self,
        serial: &str,
        enabled: bool,
        window1: &TimeWindow,
        window2: &TimeWindow,
        charge_stop_soc: u8,
    ) -> Result<Option<Value>> {
        let settings = ChargeSettings::new(serial, enabled, window1, window2, charge_stop_soc);
        settings.validate()?;
        self.logger()
            .for_serial(serial)
            .debug("Trying to set charge settings");
        self.update_charge_config_info(&settings).await
    }

    /// Configure time-controlled discharging for a system.
    ///
    /// # Arguments
    ///
    /// * `serial` - system serial number
    /// * `enabled` - whether discharge control is active
    /// * `window1` / `window2` - discharge periods
    /// * `discharge_cutoff_soc` - stop discharging at this state of charge (%)
    pub async fn set_battery_discharge(
        &self,
        serial: &str,
        enabled: bool,
        window1: &TimeWindow,
        window2: &TimeWindow,
        discharge_cutoff_soc: u8,
    ) -> Result<Option<Value>> {
        let settings =
            DischargeSettings::new(serial, enabled, window1, window2, discharge_cutoff_soc);
        settings.validate()?;
        self.logger()
            .for_serial(serial)
            .debug("Trying to set discharge settings");
        self.update_dis_charge_config_info(&settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn charge_settings_use_api_field_names() {
        let s = ChargeSettings::new(
            "AL1",
            true,
            &TimeWindow::new("01:00", "05:30"),
            &TimeWindow::new("13:00", "14:00"),
            90,
        );
        assert_eq!(
            serde_json::to_value(&s).unwrap(),
            json!({
                "sysSn": "AL1",
                "batHighCap": 90,
                "gridCharge": 1,
                "timeChaf1": "01:00",
                "timeChae1": "05:30",
                "timeChaf2": "13:00",
                "timeChae2": "14:00"
            })
        );
    }

    #[test]
    fn discharge_settings_use_api_field_names() {
        let s = DischargeSettings::new(
            "AL1",
            false,
            &TimeWindow::new("17:00", "22:00"),
            &TimeWindow::disabled(),
            10,
        );
        assert_eq!(
            serde_json::to_value(&s).unwrap(),
            json!({
                "sysSn": "AL1",
                "batUseCap": 10,
                "ctrDis": 0,
                "timeDisf1": "17:00",
                "timeDise1": "22:00",
                "timeDisf2": "00:00",
                "timeDise2": "00:00"
            })
        );
    }

    #[test]
    fn validation_rejects_bad_soc_and_times() {
        let w = TimeWindow::new("01:00", "02:00");
        assert!(ChargeSettings::new("AL1", true, &w, &w, 100).validate().is_ok());
        assert!(ChargeSettings::new("AL1", true, &w, &w, 101).validate().is_err());
        assert!(
            ChargeSettings::new("AL1", true, &TimeWindow::new("25:00", "02:00"), &w, 90)
                .validate()
                .is_err()
        );
        assert!(
            DischargeSettings::new("AL1", true, &w, &TimeWindow::new("1pm", "2pm"), 10)
                .validate()
                .is_err()
        );
        assert!(DischargeSettings::new(" ", true, &w, &w, 10).validate().is_err());
    }
}
