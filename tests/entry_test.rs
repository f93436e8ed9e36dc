//! End-to-end tests for the guided entry flow, driven by a scripted prompt
//! and an in-memory store.

use std::collections::VecDeque;

use faraday::config::EntryConfig;
use faraday::entry::{EntryPrompt, EntryStateMachine, Flow, SessionOutcome};
use faraday::record::{Brand, CurvePoint, VehicleRecord};
use faraday::store::VehicleStore;
use faraday::{Result, ValidationEngine};
use uuid::Uuid;

/// One scripted answer; popped in prompt-call order
#[derive(Debug, Clone)]
enum Reply {
    Select(Flow<usize>),
    MultiSelect(Flow<Vec<usize>>),
    Text(Flow<String>),
    Integer(Flow<i64>),
    IntegerOrDone(Flow<Option<i64>>),
    Float(Flow<f64>),
    Confirm(Flow<bool>),
}

struct ScriptedPrompt {
    replies: VecDeque<Reply>,
    warnings: Vec<String>,
}

impl ScriptedPrompt {
    fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: replies.into(),
            warnings: Vec::new(),
        }
    }

    fn pop(&mut self, message: &str) -> Reply {
        self.replies
            .pop_front()
            .unwrap_or_else(|| panic!("script exhausted at prompt: {message}"))
    }
}

#[async_trait::async_trait]
impl EntryPrompt for ScriptedPrompt {
    async fn select(&mut self, message: &str, _choices: &[String]) -> Result<Flow<usize>> {
        match self.pop(message) {
            Reply::Select(flow) => Ok(flow),
            other => panic!("expected Select at '{message}', scripted {other:?}"),
        }
    }

    async fn multi_select(
        &mut self,
        message: &str,
        _choices: &[String],
    ) -> Result<Flow<Vec<usize>>> {
        match self.pop(message) {
            Reply::MultiSelect(flow) => Ok(flow),
            other => panic!("expected MultiSelect at '{message}', scripted {other:?}"),
        }
    }

    async fn ask_text(&mut self, message: &str) -> Result<Flow<String>> {
        match self.pop(message) {
            Reply::Text(flow) => Ok(flow),
            other => panic!("expected Text at '{message}', scripted {other:?}"),
        }
    }

    async fn ask_integer(&mut self, message: &str, _min: i64, _max: i64) -> Result<Flow<i64>> {
        match self.pop(message) {
            Reply::Integer(flow) => Ok(flow),
            other => panic!("expected Integer at '{message}', scripted {other:?}"),
        }
    }

    async fn ask_integer_or_done(
        &mut self,
        message: &str,
        _min: i64,
        _max: i64,
    ) -> Result<Flow<Option<i64>>> {
        match self.pop(message) {
            Reply::IntegerOrDone(flow) => Ok(flow),
            other => panic!("expected IntegerOrDone at '{message}', scripted {other:?}"),
        }
    }

    async fn ask_positive_f64(&mut self, message: &str, _max: Option<f64>) -> Result<Flow<f64>> {
        match self.pop(message) {
            Reply::Float(flow) => Ok(flow),
            other => panic!("expected Float at '{message}', scripted {other:?}"),
        }
    }

    async fn confirm(&mut self, message: &str) -> Result<Flow<bool>> {
        match self.pop(message) {
            Reply::Confirm(flow) => Ok(flow),
            other => panic!("expected Confirm at '{message}', scripted {other:?}"),
        }
    }

    async fn say(&mut self, _message: &str) -> Result<()> {
        Ok(())
    }

    async fn warn(&mut self, message: &str) -> Result<()> {
        self.warnings.push(message.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct MemoryStore {
    brands: Vec<Brand>,
    saved: Vec<VehicleRecord>,
}

#[async_trait::async_trait]
impl VehicleStore for MemoryStore {
    async fn existing_brands(&self) -> Result<Vec<String>> {
        Ok(self.brands.iter().map(|brand| brand.name.clone()).collect())
    }

    async fn existing_models(&self, brand: &str) -> Result<Vec<String>> {
        Ok(self
            .saved
            .iter()
            .filter(|record| record.brand == brand)
            .map(|record| record.model.clone())
            .collect())
    }

    async fn find_or_create_brand_id(&self, brand: &str) -> Result<Uuid> {
        Ok(self
            .brands
            .iter()
            .find(|existing| existing.name == brand)
            .map_or_else(Uuid::new_v4, |existing| existing.id))
    }

    async fn persist(&mut self, record: &VehicleRecord) -> Result<()> {
        self.saved.push(record.clone());
        Ok(())
    }
}

fn machine(replies: Vec<Reply>) -> EntryStateMachine<ScriptedPrompt, MemoryStore> {
    EntryStateMachine::new(
        ScriptedPrompt::new(replies),
        MemoryStore::default(),
        EntryConfig::default(),
    )
}

/// Script fragment for brand/model/type/variant with a new brand
fn head_steps(brand: &str, model: &str, battery_kwh: f64) -> Vec<Reply> {
    vec![
        Reply::Select(Flow::Value(1)),                     // add new brand
        Reply::Text(Flow::Value(brand.to_string())),       // brand name
        Reply::Select(Flow::Value(1)),                     // add new model
        Reply::Text(Flow::Value(model.to_string())),       // model name
        Reply::Select(Flow::Value(0)),                     // vehicle type: car
        Reply::Text(Flow::Value("Long Range".to_string())), // variant
        Reply::Integer(Flow::Value(2024)),                 // release year
        Reply::Float(Flow::Value(battery_kwh)),            // battery size
        Reply::Float(Flow::Value(16.7)),                   // consumption
    ]
}

#[tokio::test]
async fn full_run_with_default_curve_round_trips() {
    let mut replies = head_steps("Hyundai", "Ioniq 5", 60.0);
    replies.extend([
        Reply::Confirm(Flow::Value(true)),            // has AC ports
        Reply::MultiSelect(Flow::Value(vec![1])),     // type2
        Reply::Select(Flow::Value(2)),                // 3 phases
        Reply::Float(Flow::Value(11.0)),              // AC max power
        Reply::Confirm(Flow::Value(true)),            // supports DC
        Reply::MultiSelect(Flow::Value(vec![0])),     // ccs
        Reply::Float(Flow::Value(150.0)),             // DC max power
        Reply::Select(Flow::Value(1)),                // 800 V
        Reply::Confirm(Flow::Value(true)),            // use default curve
        Reply::Confirm(Flow::Value(true)),            // save
        Reply::Confirm(Flow::Value(false)),           // no more vehicles
    ]);

    let mut machine = machine(replies);
    machine.run().await.unwrap();

    let (prompt, store) = machine.into_parts();
    assert!(prompt.warnings.is_empty(), "unexpected warnings: {:?}", prompt.warnings);
    assert_eq!(store.saved.len(), 1);

    let record = &store.saved[0];
    assert_eq!(record.brand, "Hyundai");
    assert_eq!(record.model, "Ioniq 5");
    assert_eq!(ValidationEngine::new().validate_record(record), Vec::<String>::new());

    let dc = record.dc_charger.as_ref().unwrap();
    assert!(dc.is_default_charging_curve);
    assert_eq!(
        dc.charging_curve,
        vec![
            CurvePoint::new(0.0, 150.0),
            CurvePoint::new(40.0, 150.0),
            CurvePoint::new(70.0, 135.0),
            CurvePoint::new(85.0, 75.0),
            CurvePoint::new(100.0, 30.0),
        ]
    );
}

#[tokio::test]
async fn exit_during_charging_details_aborts_without_persisting() {
    let mut replies = head_steps("Tesla", "Model 3", 60.0);
    replies.push(Reply::Confirm(Flow::Exit)); // AC ports question

    let mut machine = machine(replies);
    let outcome = machine.run_session().await.unwrap();
    assert_eq!(outcome, SessionOutcome::Aborted);

    let (_, store) = machine.into_parts();
    assert!(store.saved.is_empty());
}

#[tokio::test]
async fn back_from_model_re_runs_brand_step() {
    let mut replies = vec![
        Reply::Select(Flow::Value(1)),               // add new brand
        Reply::Text(Flow::Value("Tesla".to_string())),
        Reply::Select(Flow::Back),                   // model step: go back
        Reply::Select(Flow::Value(1)),               // brand step again
        Reply::Text(Flow::Value("Rivian".to_string())),
        Reply::Select(Flow::Value(1)),               // add new model
        Reply::Text(Flow::Value("R1T".to_string())),
        Reply::Select(Flow::Value(0)),               // car
        Reply::Text(Flow::Value(String::new())),     // empty variant
        Reply::Integer(Flow::Value(2023)),
        Reply::Float(Flow::Value(120.0)),
        Reply::Float(Flow::Value(25.0)),
    ];
    replies.extend([
        Reply::Confirm(Flow::Value(false)), // no AC ports
        Reply::Select(Flow::Value(0)),      // 1 phase
        Reply::Float(Flow::Value(7.4)),     // AC max power
        Reply::Confirm(Flow::Value(false)), // no DC
        Reply::Select(Flow::Value(0)),      // 400 V
        Reply::Confirm(Flow::Value(true)),  // save
    ]);

    let mut machine = machine(replies);
    let outcome = machine.run_session().await.unwrap();
    assert!(matches!(outcome, SessionOutcome::Saved(_)));

    let (_, store) = machine.into_parts();
    assert_eq!(store.saved.len(), 1);
    let record = &store.saved[0];
    assert_eq!(record.brand, "Rivian");
    assert_eq!(record.variant, "");
    assert!(record.dc_charger.is_none());
    assert_eq!(ValidationEngine::new().validate_record(record), Vec::<String>::new());
}

#[tokio::test]
async fn malformed_hand_entered_curve_falls_back_to_default() {
    let mut replies = head_steps("Microlino", "Lite", 8.0);
    replies.extend([
        Reply::Confirm(Flow::Value(false)),              // no AC ports
        Reply::Select(Flow::Value(0)),                   // 1 phase
        Reply::Float(Flow::Value(7.4)),                  // AC max power
        Reply::Confirm(Flow::Value(true)),               // supports DC
        Reply::MultiSelect(Flow::Value(vec![0])),        // ccs
        Reply::Float(Flow::Value(10.0)),                 // DC max power
        Reply::Select(Flow::Value(0)),                   // 400 V
        Reply::Confirm(Flow::Value(false)),              // hand-enter curve
        Reply::IntegerOrDone(Flow::Value(Some(10))),     // 10%
        Reply::Float(Flow::Value(5.0)),
        Reply::IntegerOrDone(Flow::Value(Some(100))),    // 100%
        Reply::Float(Flow::Value(5.0)),
        Reply::IntegerOrDone(Flow::Value(None)),         // done, but no 0% point
        Reply::Confirm(Flow::Value(true)),               // save
    ]);

    let mut machine = machine(replies);
    let outcome = machine.run_session().await.unwrap();
    assert!(matches!(outcome, SessionOutcome::Saved(_)));

    let (prompt, store) = machine.into_parts();
    assert!(
        prompt
            .warnings
            .iter()
            .any(|w| w.contains("Using default curve instead"))
    );

    let dc = store.saved[0].dc_charger.as_ref().unwrap();
    assert!(dc.is_default_charging_curve);
    // Small-tier 400 V shape with the AC tail
    assert_eq!(
        dc.charging_curve,
        vec![
            CurvePoint::new(0.0, 10.0),
            CurvePoint::new(70.0, 10.0),
            CurvePoint::new(100.0, 7.4),
        ]
    );
}

#[tokio::test]
async fn declining_confirmation_can_restart_or_abort() {
    let mut replies = head_steps("Nio", "ET5", 75.0);
    replies.extend([
        Reply::Confirm(Flow::Value(false)), // no AC ports
        Reply::Select(Flow::Value(0)),      // 1 phase
        Reply::Float(Flow::Value(7.4)),
        Reply::Confirm(Flow::Value(false)), // no DC
        Reply::Select(Flow::Value(0)),      // 400 V
        Reply::Confirm(Flow::Value(false)), // do not save
        Reply::Confirm(Flow::Value(true)),  // start over
    ]);
    let mut machine = machine(replies);
    assert_eq!(
        machine.run_session().await.unwrap(),
        SessionOutcome::Restarted
    );
    let (_, store) = machine.into_parts();
    assert!(store.saved.is_empty());
}

#[tokio::test]
async fn exit_at_first_step_aborts() {
    let mut machine = machine(vec![Reply::Select(Flow::Exit)]);
    assert_eq!(machine.run_session().await.unwrap(), SessionOutcome::Aborted);
    let (_, store) = machine.into_parts();
    assert!(store.saved.is_empty());
}
