//! Aggregation pass: one composite record per system
//!
//! The system list is fetched once, then every system is enriched through a
//! fixed, strictly sequential pipeline of read calls with a pause between
//! consecutive calls. The API is rate limited per application ID, which is why
//! nothing here runs concurrently.
//!
//! A read that comes back without data only leaves its field empty. A
//! transport failure on any call ends the pass with that error.

use crate::client::AlphaEssClient;
use crate::error::{AlphaEssError, Result};
use crate::logging::{LogContext, get_logger_with_context};
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;

/// One read in the per-system pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationStep {
    SumData,
    OneDateEnergy,
    LastPower,
    ChargeConfig,
    DisChargeConfig,
    OneDayPower,
}

impl AggregationStep {
    /// Steps always issued, in order
    pub const BASE: [AggregationStep; 5] = [
        AggregationStep::SumData,
        AggregationStep::OneDateEnergy,
        AggregationStep::LastPower,
        AggregationStep::ChargeConfig,
        AggregationStep::DisChargeConfig,
    ];

    /// Ordered steps for one system
    pub fn plan(include_power_curve: bool) -> Vec<Self> {
        let mut steps = Self::BASE.to_vec();
        if include_power_curve {
            steps.push(AggregationStep::OneDayPower);
        }
        steps
    }

    /// Key the result is stored under in the composite record
    pub fn field_name(self) -> &'static str {
        match self {
            Self::SumData => "SumData",
            Self::OneDateEnergy => "OneDateEnergy",
            Self::LastPower => "LastPower",
            Self::ChargeConfig => "ChargeConfig",
            Self::DisChargeConfig => "DisChargeConfig",
            Self::OneDayPower => "OneDayPower",
        }
    }
}

/// A system from the list endpoint together with everything fetched for it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Device {
    #[serde(rename = "sysSn")]
    pub sys_sn: String,

    /// Remaining fields of the list entry, passed through untouched
    #[serde(flatten)]
    pub attributes: Map<String, Value>,

    #[serde(rename = "SumData")]
    pub sum_data: Option<Value>,
    #[serde(rename = "OneDateEnergy")]
    pub one_date_energy: Option<Value>,
    #[serde(rename = "LastPower")]
    pub last_power: Option<Value>,
    #[serde(rename = "ChargeConfig")]
    pub charge_config: Option<Value>,
    #[serde(rename = "DisChargeConfig")]
    pub dis_charge_config: Option<Value>,

    /// Outer `None`: curve not requested. `Some(None)`: requested, no data.
    #[serde(rename = "OneDayPower", skip_serializing_if = "Option::is_none")]
    pub one_day_power: Option<Option<Value>>,
}

impl Device {
    /// Build an empty record from a list entry; `None` when it has no `sysSn`
    pub fn from_list_entry(entry: Value) -> Option<Self> {
        let sys_sn = serial_of(&entry)?;
        let Value::Object(mut attributes) = entry else {
            return None;
        };
        attributes.remove("sysSn");
        for step in AggregationStep::plan(true) {
            attributes.remove(step.field_name());
        }
        Some(Self {
            sys_sn,
            attributes,
            sum_data: None,
            one_date_energy: None,
            last_power: None,
            charge_config: None,
            dis_charge_config: None,
            one_day_power: None,
        })
    }

    /// Store the (possibly absent) result of a step
    pub fn store(&mut self, step: AggregationStep, value: Option<Value>) {
        match step {
            AggregationStep::SumData => self.sum_data = value,
            AggregationStep::OneDateEnergy => self.one_date_energy = value,
            AggregationStep::LastPower => self.last_power = value,
            AggregationStep::ChargeConfig => self.charge_config = value,
            AggregationStep::DisChargeConfig => self.dis_charge_config = value,
            AggregationStep::OneDayPower => self.one_day_power = Some(value),
        }
    }

    /// Result stored for a step; `None` when absent or not requested
    pub fn field(&self, step: AggregationStep) -> Option<&Value> {
        match step {
            AggregationStep::SumData => self.sum_data.as_ref(),
            AggregationStep::OneDateEnergy => self.one_date_energy.as_ref(),
            AggregationStep::LastPower => self.last_power.as_ref(),
            AggregationStep::ChargeConfig => self.charge_config.as_ref(),
            AggregationStep::DisChargeConfig => self.dis_charge_config.as_ref(),
            AggregationStep::OneDayPower => self.one_day_power.as_ref().and_then(|v| v.as_ref()),
        }
    }
}

/// Serial number of a list entry. Numeric serials are accepted as text.
pub(crate) fn serial_of(entry: &Value) -> Option<String> {
    match entry.get("sysSn")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

async fn throttle(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

impl AlphaEssClient {
    /// Run one aggregation pass over every system in the list.
    ///
    /// # Arguments
    ///
    /// * `include_power_curve` - also fetch the intraday power series
    /// * `inter_call_delay` - pause between consecutive calls for a system
    pub async fn get_data(
        &self,
        include_power_curve: bool,
        inter_call_delay: Duration,
    ) -> Result<Vec<Device>> {
        let pass_id = uuid::Uuid::new_v4().to_string();
        let logger =
            get_logger_with_context(LogContext::new("aggregator").with_pass_id(pass_id));

        let units = self
            .get_ess_list()
            .await?
            .ok_or_else(|| AlphaEssError::api("System list unavailable"))?;
        let Value::Array(units) = units else {
            return Err(AlphaEssError::api("System list is not an array"));
        };

        let plan = AggregationStep::plan(include_power_curve);
        let mut devices = Vec::with_capacity(units.len());

        for unit in units {
            let Some(mut device) = Device::from_list_entry(unit) else {
                logger.debug("Skipping list entry without sysSn");
                continue;
            };
            let device_logger = logger.for_serial(&device.sys_sn);

            for (i, step) in plan.iter().copied().enumerate() {
                if i > 0 {
                    throttle(inter_call_delay).await;
                }
                let step_logger = device_logger.with_field("step", step.field_name());
                let value = self
                    .fetch_step(step, &device.sys_sn)
                    .await
                    .inspect_err(|e| {
                        step_logger.error(&format!("Read failed, aborting pass: {}", e));
                    })?;
                if value.is_none() {
                    step_logger.warn("No data returned");
                }
                device.store(step, value);
            }

            device_logger.debug("System record complete");
            devices.push(device);
        }

        logger.info(&format!("Aggregated {} system(s)", devices.len()));
        Ok(devices)
    }

    /// [`AlphaEssClient::get_data`] with the configured aggregation settings
    pub async fn get_data_with_defaults(&self) -> Result<Vec<Device>> {
        let aggregation = self.aggregation();
        self.get_data(
            aggregation.include_power_curve,
            aggregation.inter_call_delay(),
        )
        .await
    }

    async fn fetch_step(&self, step: AggregationStep, sys_sn: &str) -> Result<Option<Value>> {
        match step {
            AggregationStep::SumData => self.get_sum_data_for_customer(sys_sn).await,
            AggregationStep::OneDateEnergy => {
                self.get_one_date_energy_by_sn(sys_sn, self.local_today())
                    .await
            }
            AggregationStep::LastPower => self.get_last_power_data(sys_sn).await,
            AggregationStep::ChargeConfig => self.get_charge_config_info(sys_sn).await,
            AggregationStep::DisChargeConfig => self.get_dis_charge_config_info(sys_sn).await,
            AggregationStep::OneDayPower => {
                self.get_one_day_power_by_sn(sys_sn, self.local_today())
                    .await
            }
        }
    }
}
