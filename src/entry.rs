//! Guided data-entry state machine
//!
//! Drives one vehicle record through the step sequence brand → model →
//! vehicle type → variant details → charging details → charging curve →
//! confirmation. Every prompt operation returns a [`Flow`], so the operator
//! can step backward through completed steps or abort the session from
//! anywhere. How input is physically collected is delegated to an
//! [`EntryPrompt`] collaborator; the dataset is only touched once, at the
//! save transition, through the [`VehicleStore`](crate::store::VehicleStore)
//! collaborator.

use crate::config::EntryConfig;
use crate::curve::{default_charging_curve, power_per_charging_point};
use crate::error::{FaradayError, Result};
use crate::logging::{LogContext, get_logger, get_logger_with_context};
use crate::record::{
    AcCharger, AcPort, ChargingVoltage, CurvePoint, DcCharger, DcPort, EV_TYPE,
    EnergyConsumption, USABLE_PHASES, VehicleCategory, VehicleRecord,
};
use crate::store::VehicleStore;
use crate::validation::{ValidationEngine, valid_name};
use chrono::{Datelike, Utc};
use uuid::Uuid;

/// Result of a single prompt operation: a domain value, or a navigation
/// sentinel distinct from every domain value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow<T> {
    /// A collected domain value
    Value(T),
    /// Go back one step
    Back,
    /// Abort the whole session
    Exit,
}

impl<T> Flow<T> {
    /// Map the carried value, leaving sentinels untouched
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Flow<U> {
        match self {
            Flow::Value(value) => Flow::Value(f(value)),
            Flow::Back => Flow::Back,
            Flow::Exit => Flow::Exit,
        }
    }
}

/// Unwrap a [`Flow`], propagating `Back` and `Exit` out of the enclosing
/// step function.
macro_rules! flow_try {
    ($expr:expr) => {
        match $expr {
            Flow::Value(value) => value,
            Flow::Back => return Ok(Flow::Back),
            Flow::Exit => return Ok(Flow::Exit),
        }
    };
}

/// Input-collection collaborator.
///
/// Implementations own rendering and raw input parsing. Malformed raw input
/// (wrong type, out of range) is handled by re-prompting inside the
/// implementation and never escalates; the only values handed back are
/// in-range domain values or the `Back`/`Exit` sentinels.
#[async_trait::async_trait]
pub trait EntryPrompt: Send {
    /// Pick one of `choices`; returns the chosen index
    async fn select(&mut self, message: &str, choices: &[String]) -> Result<Flow<usize>>;

    /// Pick any subset of `choices`; returns the chosen indices
    async fn multi_select(&mut self, message: &str, choices: &[String]) -> Result<Flow<Vec<usize>>>;

    /// Free-form text; may be empty
    async fn ask_text(&mut self, message: &str) -> Result<Flow<String>>;

    /// Integer within `min..=max`
    async fn ask_integer(&mut self, message: &str, min: i64, max: i64) -> Result<Flow<i64>>;

    /// Integer within `min..=max`, or `None` when the operator is done
    async fn ask_integer_or_done(
        &mut self,
        message: &str,
        min: i64,
        max: i64,
    ) -> Result<Flow<Option<i64>>>;

    /// Positive number, optionally bounded above
    async fn ask_positive_f64(&mut self, message: &str, max: Option<f64>) -> Result<Flow<f64>>;

    /// Yes/no question
    async fn confirm(&mut self, message: &str) -> Result<Flow<bool>>;

    /// Show an informational message
    async fn say(&mut self, message: &str) -> Result<()>;

    /// Show a warning message
    async fn warn(&mut self, message: &str) -> Result<()>;
}

/// Terminal result of one entry session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Record was validated and handed to the store
    Saved(Uuid),
    /// Operator chose to discard the draft and start over
    Restarted,
    /// Operator exited; the dataset was not touched
    Aborted,
}

/// Entry steps, linear with back-edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryStep {
    Brand,
    Model,
    VehicleType,
    VariantDetails,
    ChargingDetails,
    ChargingCurve,
    Confirm,
}

/// Variant/specs fragment collected in one step
#[derive(Debug, Clone)]
struct VariantDetails {
    variant: String,
    release_year: u16,
    usable_battery_size: f64,
    average_consumption: f64,
}

/// Charging fragment collected in one step
#[derive(Debug, Clone)]
struct ChargingDetails {
    ac_charger: AcCharger,
    dc_charger: Option<DcCharger>,
    charging_voltage: ChargingVoltage,
}

/// Partial record under construction; each field is one step's fragment
#[derive(Debug, Default)]
struct Draft {
    brand: Option<(String, Uuid)>,
    model: Option<String>,
    vehicle_type: Option<VehicleCategory>,
    variant: Option<VariantDetails>,
    charging: Option<ChargingDetails>,
    curve: Option<(Vec<CurvePoint>, bool)>,
}

/// Orchestrates entry sessions over injected prompt and store collaborators
pub struct EntryStateMachine<P: EntryPrompt, S: VehicleStore> {
    prompt: P,
    store: S,
    validator: ValidationEngine,
    entry_config: EntryConfig,
    logger: crate::logging::StructuredLogger,
}

impl<P: EntryPrompt, S: VehicleStore> EntryStateMachine<P, S> {
    /// Create a new entry state machine over the given collaborators
    pub fn new(prompt: P, store: S, entry_config: EntryConfig) -> Self {
        let logger = get_logger("entry");
        Self {
            prompt,
            store,
            validator: ValidationEngine::new(),
            entry_config,
            logger,
        }
    }

    /// Run entry sessions until the operator exits or declines to add
    /// another vehicle.
    pub async fn run(&mut self) -> Result<()> {
        self.logger.info("Starting guided data entry");
        loop {
            match self.run_session().await? {
                SessionOutcome::Saved(id) => {
                    self.logger.info(&format!("Saved vehicle record {id}"));
                    match self
                        .prompt
                        .confirm("Would you like to add another vehicle?")
                        .await?
                    {
                        Flow::Value(true) => {}
                        _ => break,
                    }
                }
                SessionOutcome::Restarted => {}
                SessionOutcome::Aborted => break,
            }
        }
        self.logger.info("Data entry finished");
        Ok(())
    }

    /// Drive a single record through all entry steps.
    pub async fn run_session(&mut self) -> Result<SessionOutcome> {
        let session_id = Uuid::new_v4();
        let logger = get_logger_with_context(
            LogContext::new("entry").with_session_id(session_id.to_string()),
        );
        logger.debug("Session started");

        let mut draft = Draft::default();
        let mut step = EntryStep::Brand;
        loop {
            let flow = match step {
                EntryStep::Brand => self.collect_brand(&mut draft).await?,
                EntryStep::Model => self.collect_model(&mut draft).await?,
                EntryStep::VehicleType => self.collect_vehicle_type(&mut draft).await?,
                EntryStep::VariantDetails => self.collect_variant_details(&mut draft).await?,
                EntryStep::ChargingDetails => self.collect_charging_details(&mut draft).await?,
                EntryStep::ChargingCurve => self.collect_charging_curve(&mut draft).await?,
                EntryStep::Confirm => match self.confirm_record(&draft).await? {
                    Flow::Value(outcome) => {
                        logger.debug(&format!("Session finished: {outcome:?}"));
                        return Ok(outcome);
                    }
                    Flow::Back => Flow::Back,
                    Flow::Exit => Flow::Exit,
                },
            };

            step = match flow {
                Flow::Value(()) => next_step(step, &draft),
                Flow::Back => previous_step(step, &draft),
                Flow::Exit => {
                    logger.debug("Session aborted");
                    return Ok(SessionOutcome::Aborted);
                }
            };
        }
    }

    /// Consume the machine, returning the injected collaborators
    pub fn into_parts(self) -> (P, S) {
        (self.prompt, self.store)
    }

    async fn collect_brand(&mut self, draft: &mut Draft) -> Result<Flow<()>> {
        draft.brand = None;
        loop {
            let actions = vec![
                "Choose existing brand".to_string(),
                "Add new brand".to_string(),
            ];
            let action = flow_try!(
                self.prompt
                    .select("Select action for brand:", &actions)
                    .await?
            );

            let name = if action == 0 {
                let brands = self.store.existing_brands().await?;
                if brands.is_empty() {
                    self.prompt
                        .warn("No brands in the dataset yet, add a new one")
                        .await?;
                    continue;
                }
                let index = flow_try!(self.prompt.select("Select brand:", &brands).await?);
                brands[index].clone()
            } else {
                flow_try!(self.prompt.ask_text("Enter new brand name:").await?)
                    .trim()
                    .to_string()
            };

            if !valid_name(&name) {
                self.prompt
                    .warn("Brand name must be a non-empty string of letters, digits, spaces and hyphens")
                    .await?;
                continue;
            }

            let brand_id = self.store.find_or_create_brand_id(&name).await?;
            draft.brand = Some((name, brand_id));
            return Ok(Flow::Value(()));
        }
    }

    async fn collect_model(&mut self, draft: &mut Draft) -> Result<Flow<()>> {
        draft.model = None;
        let brand = draft
            .brand
            .as_ref()
            .map(|(name, _)| name.clone())
            .ok_or_else(|| FaradayError::generic("Model step reached without a brand"))?;
        loop {
            let actions = vec![
                "Choose existing model".to_string(),
                "Add new model".to_string(),
            ];
            let action = flow_try!(
                self.prompt
                    .select("Select action for model:", &actions)
                    .await?
            );

            let name = if action == 0 {
                let models = self.store.existing_models(&brand).await?;
                if models.is_empty() {
                    self.prompt
                        .warn("No models for this brand yet, add a new one")
                        .await?;
                    continue;
                }
                let index = flow_try!(self.prompt.select("Select model:", &models).await?);
                models[index].clone()
            } else {
                flow_try!(self.prompt.ask_text("Enter new model name:").await?)
                    .trim()
                    .to_string()
            };

            if !valid_name(&name) {
                self.prompt
                    .warn("Model name must be a non-empty string of letters, digits, spaces and hyphens")
                    .await?;
                continue;
            }

            draft.model = Some(name);
            return Ok(Flow::Value(()));
        }
    }

    async fn collect_vehicle_type(&mut self, draft: &mut Draft) -> Result<Flow<()>> {
        draft.vehicle_type = None;
        let choices: Vec<String> = VehicleCategory::ALL
            .iter()
            .map(|category| category.as_str().to_string())
            .collect();
        let index = flow_try!(self.prompt.select("Select vehicle type:", &choices).await?);
        draft.vehicle_type = Some(VehicleCategory::ALL[index]);
        Ok(Flow::Value(()))
    }

    async fn collect_variant_details(&mut self, draft: &mut Draft) -> Result<Flow<()>> {
        draft.variant = None;

        let variant = flow_try!(self.prompt.ask_text("Enter variant name (optional):").await?)
            .trim()
            .to_string();

        let max_year = i64::from(Utc::now().year()) + 1;
        let release_year = flow_try!(
            self.prompt
                .ask_integer(
                    "Enter release year:",
                    i64::from(self.entry_config.min_release_year),
                    max_year,
                )
                .await?
        ) as u16;

        let usable_battery_size = flow_try!(
            self.prompt
                .ask_positive_f64("Enter usable battery size (kWh):", None)
                .await?
        );

        let average_consumption = flow_try!(
            self.prompt
                .ask_positive_f64("Enter average consumption (kWh/100km):", None)
                .await?
        );

        draft.variant = Some(VariantDetails {
            variant,
            release_year,
            usable_battery_size,
            average_consumption,
        });
        Ok(Flow::Value(()))
    }

    async fn collect_charging_details(&mut self, draft: &mut Draft) -> Result<Flow<()>> {
        draft.charging = None;
        draft.curve = None;
        let category = draft
            .vehicle_type
            .ok_or_else(|| FaradayError::generic("Charging step reached without a vehicle type"))?;

        loop {
            let ac_charger = flow_try!(self.collect_ac_charger().await?);
            let dc_charger = flow_try!(self.collect_dc_charger().await?);
            let charging_voltage = flow_try!(self.select_voltage(category).await?);

            let errors = self
                .validator
                .validate_charging(&ac_charger, dc_charger.as_ref());
            if !errors.is_empty() {
                for error in &errors {
                    self.prompt.warn(error).await?;
                }
                continue;
            }

            draft.charging = Some(ChargingDetails {
                ac_charger,
                dc_charger,
                charging_voltage,
            });
            return Ok(Flow::Value(()));
        }
    }

    async fn collect_ac_charger(&mut self) -> Result<Flow<AcCharger>> {
        let has_ports = flow_try!(
            self.prompt
                .confirm("Does this vehicle have (type1, type2) AC charging ports?")
                .await?
        );
        let ports: Vec<AcPort> = if has_ports {
            let labels: Vec<String> = AcPort::ALL
                .iter()
                .map(|port| port.as_str().to_string())
                .collect();
            flow_try!(self.prompt.multi_select("Select AC ports:", &labels).await?)
                .into_iter()
                .map(|index| AcPort::ALL[index])
                .collect()
        } else {
            Vec::new()
        };

        let phase_labels: Vec<String> = USABLE_PHASES.iter().map(u8::to_string).collect();
        let phase_index = flow_try!(self.prompt.select("Select AC phases:", &phase_labels).await?);
        let usable_phases = USABLE_PHASES[phase_index];

        let max_power = flow_try!(
            self.prompt
                .ask_positive_f64("Enter max AC power (kW):", None)
                .await?
        );

        Ok(Flow::Value(AcCharger {
            ports,
            usable_phases,
            max_power,
            power_per_charging_point: Some(power_per_charging_point(max_power)),
        }))
    }

    async fn collect_dc_charger(&mut self) -> Result<Flow<Option<DcCharger>>> {
        let supports_dc = flow_try!(
            self.prompt
                .confirm("Does this vehicle support DC charging?")
                .await?
        );
        if !supports_dc {
            return Ok(Flow::Value(None));
        }

        let labels: Vec<String> = DcPort::ALL
            .iter()
            .map(|port| port.as_str().to_string())
            .collect();
        let ports: Vec<DcPort> = loop {
            let indices = flow_try!(
                self.prompt
                    .multi_select("Select DC ports (at least one required):", &labels)
                    .await?
            );
            if indices.is_empty() {
                self.prompt.warn("At least one DC port is required").await?;
                continue;
            }
            break indices.into_iter().map(|index| DcPort::ALL[index]).collect();
        };

        let max_power = flow_try!(
            self.prompt
                .ask_positive_f64("Enter max DC power (kW):", None)
                .await?
        );

        // Curve is collected in its own step
        Ok(Flow::Value(Some(DcCharger {
            ports,
            max_power,
            charging_curve: Vec::new(),
            is_default_charging_curve: false,
        })))
    }

    async fn select_voltage(&mut self, category: VehicleCategory) -> Result<Flow<ChargingVoltage>> {
        let voltages = category.allowed_voltages();
        let labels: Vec<String> = voltages.iter().map(ToString::to_string).collect();
        let index = flow_try!(
            self.prompt
                .select("Select voltage architecture (V):", &labels)
                .await?
        );
        Ok(Flow::Value(voltages[index]))
    }

    async fn collect_charging_curve(&mut self, draft: &mut Draft) -> Result<Flow<()>> {
        draft.curve = None;
        let charging = draft
            .charging
            .as_ref()
            .ok_or_else(|| FaradayError::generic("Curve step reached without charging details"))?;
        let dc_max_power = charging
            .dc_charger
            .as_ref()
            .map(|dc| dc.max_power)
            .ok_or_else(|| FaradayError::generic("Curve step reached without a DC charger"))?;
        let ac_max_power = charging.ac_charger.max_power;
        let battery = draft
            .variant
            .as_ref()
            .map(|variant| variant.usable_battery_size)
            .ok_or_else(|| FaradayError::generic("Curve step reached without variant details"))?;
        let voltage = charging.charging_voltage;

        let use_default = flow_try!(
            self.prompt
                .confirm("Would you like to use a default charging curve?")
                .await?
        );
        if use_default {
            let curve = default_charging_curve(battery, dc_max_power, ac_max_power, voltage)?;
            draft.curve = Some((curve, true));
            return Ok(Flow::Value(()));
        }

        let min_points = self.entry_config.min_curve_points;
        self.prompt
            .say(&format!(
                "Enter charging curve points (minimum {min_points} points required):"
            ))
            .await?;
        self.prompt
            .say("First point must be 0%, last point must be 100%")
            .await?;

        let mut points: Vec<CurvePoint> = Vec::new();
        loop {
            let percentage = flow_try!(
                self.prompt
                    .ask_integer_or_done("Enter percentage (0-100, or 'done'):", 0, 100)
                    .await?
            );
            let Some(percentage) = percentage else { break };
            let percentage = percentage as f64;

            if points.iter().any(|point| point.percentage == percentage) {
                self.prompt
                    .warn(&format!(
                        "Percentage {percentage}% already exists. Please use a different value."
                    ))
                    .await?;
                continue;
            }

            let power = flow_try!(
                self.prompt
                    .ask_positive_f64(
                        &format!("Enter power at {percentage}% (max {dc_max_power} kW):"),
                        Some(dc_max_power),
                    )
                    .await?
            );
            points.push(CurvePoint::new(percentage, power));

            let rendered: Vec<String> = points
                .iter()
                .map(|point| format!("{}%: {}kW", point.percentage, point.power))
                .collect();
            self.prompt
                .say(&format!("Current curve: {}", rendered.join(" -> ")))
                .await?;
        }

        // Sort before acceptance, regardless of entry order
        points.sort_by(|a, b| a.percentage.total_cmp(&b.percentage));

        let well_formed = points.len() >= min_points
            && points.first().is_some_and(|point| point.percentage == 0.0)
            && points.last().is_some_and(|point| point.percentage == 100.0);
        if well_formed {
            draft.curve = Some((points, false));
        } else {
            // Deliberate fallback: malformed hand-entered curves are replaced
            // by the synthesized default, not rejected outright
            self.prompt
                .warn(&format!(
                    "Curve must have at least {min_points} points, start at 0% and end at 100%. Using default curve instead."
                ))
                .await?;
            let curve = default_charging_curve(battery, dc_max_power, ac_max_power, voltage)?;
            draft.curve = Some((curve, true));
        }
        Ok(Flow::Value(()))
    }

    async fn confirm_record(&mut self, draft: &Draft) -> Result<Flow<SessionOutcome>> {
        let record = self.assemble_record(draft)?;
        self.show_summary(&record).await?;

        let save = flow_try!(
            self.prompt
                .confirm("Would you like to save this vehicle?")
                .await?
        );
        if save {
            let errors = self.validator.validate_record(&record);
            if errors.is_empty() {
                self.store.persist(&record).await?;
                return Ok(Flow::Value(SessionOutcome::Saved(record.id)));
            }
            for error in &errors {
                self.prompt.warn(error).await?;
            }
            return match self
                .prompt
                .confirm("Would you like to go back and fix the details?")
                .await?
            {
                Flow::Value(true) | Flow::Back => Ok(Flow::Back),
                Flow::Value(false) | Flow::Exit => Ok(Flow::Value(SessionOutcome::Aborted)),
            };
        }

        match self.prompt.confirm("Would you like to start over?").await? {
            Flow::Value(true) => Ok(Flow::Value(SessionOutcome::Restarted)),
            Flow::Back => Ok(Flow::Back),
            Flow::Value(false) | Flow::Exit => Ok(Flow::Value(SessionOutcome::Aborted)),
        }
    }

    fn assemble_record(&self, draft: &Draft) -> Result<VehicleRecord> {
        let incomplete = |step: &str| FaradayError::generic(format!("Draft is missing {step}"));
        let (brand, brand_id) = draft.brand.clone().ok_or_else(|| incomplete("brand"))?;
        let model = draft.model.clone().ok_or_else(|| incomplete("model"))?;
        let vehicle_type = draft.vehicle_type.ok_or_else(|| incomplete("vehicle type"))?;
        let variant = draft
            .variant
            .clone()
            .ok_or_else(|| incomplete("variant details"))?;
        let charging = draft
            .charging
            .clone()
            .ok_or_else(|| incomplete("charging details"))?;

        let dc_charger = match charging.dc_charger {
            Some(dc) => {
                let (charging_curve, is_default) = draft
                    .curve
                    .clone()
                    .ok_or_else(|| incomplete("charging curve"))?;
                Some(DcCharger {
                    charging_curve,
                    is_default_charging_curve: is_default,
                    ..dc
                })
            }
            None => None,
        };

        Ok(VehicleRecord {
            id: Uuid::new_v4(),
            kind: EV_TYPE.to_string(),
            brand,
            brand_id,
            model,
            vehicle_type,
            variant: variant.variant,
            release_year: variant.release_year,
            usable_battery_size: variant.usable_battery_size,
            energy_consumption: EnergyConsumption {
                average_consumption: variant.average_consumption,
            },
            charging_voltage: charging.charging_voltage,
            ac_charger: charging.ac_charger,
            dc_charger,
        })
    }

    async fn show_summary(&mut self, record: &VehicleRecord) -> Result<()> {
        let mut lines = vec![
            "Please confirm the vehicle details:".to_string(),
            "-----------------------------------".to_string(),
            format!("Brand: {}", record.brand),
            format!("Model: {}", record.model),
            format!("Type: {}", record.vehicle_type),
            format!("Variant: {}", record.variant),
            format!("Release Year: {}", record.release_year),
            format!("Battery Size: {} kWh", record.usable_battery_size),
            format!(
                "Energy Consumption: {} kWh/100km",
                record.energy_consumption.average_consumption
            ),
            format!("Charging Voltage: {} V", record.charging_voltage),
            String::new(),
            "AC Charging:".to_string(),
            format!(
                "- Ports: {}",
                record
                    .ac_charger
                    .ports
                    .iter()
                    .map(|port| port.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            format!("- Phases: {}", record.ac_charger.usable_phases),
            format!("- Max Power: {} kW", record.ac_charger.max_power),
        ];

        if let Some(dc) = &record.dc_charger {
            lines.push(String::new());
            lines.push("DC Charging:".to_string());
            lines.push(format!(
                "- Ports: {}",
                dc.ports
                    .iter()
                    .map(|port| port.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
            lines.push(format!("- Max Power: {} kW", dc.max_power));
            lines.push("- Charging Curve:".to_string());
            for point in &dc.charging_curve {
                lines.push(format!("  {}%: {} kW", point.percentage, point.power));
            }
        }
        lines.push("-----------------------------------".to_string());

        for line in lines {
            self.prompt.say(&line).await?;
        }
        Ok(())
    }
}

fn next_step(step: EntryStep, draft: &Draft) -> EntryStep {
    match step {
        EntryStep::Brand => EntryStep::Model,
        EntryStep::Model => EntryStep::VehicleType,
        EntryStep::VehicleType => EntryStep::VariantDetails,
        EntryStep::VariantDetails => EntryStep::ChargingDetails,
        EntryStep::ChargingDetails => {
            if has_dc_charger(draft) {
                EntryStep::ChargingCurve
            } else {
                EntryStep::Confirm
            }
        }
        EntryStep::ChargingCurve | EntryStep::Confirm => EntryStep::Confirm,
    }
}

fn previous_step(step: EntryStep, draft: &Draft) -> EntryStep {
    match step {
        // Nothing precedes the brand step; it re-runs from scratch
        EntryStep::Brand => EntryStep::Brand,
        EntryStep::Model => EntryStep::Brand,
        EntryStep::VehicleType => EntryStep::Model,
        EntryStep::VariantDetails => EntryStep::VehicleType,
        EntryStep::ChargingDetails => EntryStep::VariantDetails,
        EntryStep::ChargingCurve => EntryStep::ChargingDetails,
        EntryStep::Confirm => {
            if has_dc_charger(draft) {
                EntryStep::ChargingCurve
            } else {
                EntryStep::ChargingDetails
            }
        }
    }
}

fn has_dc_charger(draft: &Draft) -> bool {
    draft
        .charging
        .as_ref()
        .is_some_and(|charging| charging.dc_charger.is_some())
}
