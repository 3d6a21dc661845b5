//! Orchestration tests with mock models, modifiers, and writers.

use whorl_core::GridDescriptor;
use whorl_domain::Decomposition;
use whorl_engine::{SaveSchedule, Simulator, SimulatorError, TimeController};
use whorl_model::ModelError;
use whorl_test_utils::{FillModifier, MockModel, RecordingWriter};

fn harness(schedule: SaveSchedule, t1: f64) -> Simulator {
    let grid = GridDescriptor::with_unit_spacing([4, 3, 2]).unwrap();
    let decomposition = Decomposition::new(&grid, 0, 1).unwrap();
    let model = MockModel::new(
        grid,
        decomposition.inbox(),
        decomposition.outbox(),
    )
    .with_field("phi");
    let time = TimeController::new(0.0, t1, 1.0, schedule).unwrap();
    Simulator::new(decomposition, Box::new(model), time).unwrap()
}

#[test]
fn initial_conditions_apply_once_at_start_time() {
    let mut sim = harness(SaveSchedule::Never, 10.0);
    let ic = FillModifier::new("phi", 1.0);
    let applications = ic.applications();
    sim.add_initial_condition(Box::new(ic));

    assert_eq!(*sim.model().field("phi").unwrap().at([0, 0, 0]).unwrap(), 0.0);
    sim.step().unwrap();
    assert!(sim.model().field("phi").unwrap().data().iter().all(|&v| v == 1.0));
    assert_eq!(*applications.lock().unwrap(), [0.0]);

    sim.step().unwrap();
    sim.step().unwrap();
    // Still only the one application, at t0.
    assert_eq!(*applications.lock().unwrap(), [0.0]);
}

#[test]
fn boundary_conditions_apply_every_step_after_the_update() {
    let mut sim = harness(SaveSchedule::Never, 3.0);
    let bc = FillModifier::new("phi", 2.0);
    let applications = bc.applications();
    sim.add_boundary_condition(Box::new(bc));

    sim.run().unwrap();
    // Applied at the post-step times t = 1, 2, 3.
    assert_eq!(*applications.lock().unwrap(), [1.0, 2.0, 3.0]);
    assert!(sim.done());
}

#[test]
fn writers_fire_on_the_stride_with_local_save_indexes() {
    let mut sim = harness(SaveSchedule::Stride(2), 4.0);
    sim.add_initial_condition(Box::new(FillModifier::new("phi", 1.0)));

    let writer = RecordingWriter::new();
    let (captures, domain) = writer.handles();
    sim.add_results_writer("phi", Box::new(writer)).unwrap();

    let bound = domain.lock().unwrap().clone().unwrap();
    assert_eq!(bound.global_dims, [4, 3, 2]);
    assert_eq!(bound.local_dims, [4, 3, 2]);
    assert_eq!(bound.local_offset, [0, 0, 0]);
    assert_eq!(bound.field_name, "phi");

    sim.run().unwrap();

    let captures = captures.lock().unwrap();
    // Saves at n = 0, 2, 4 under writer-local indexes 0, 1, 2.
    let indexes: Vec<_> = captures.iter().map(|c| c.save_index).collect();
    assert_eq!(indexes, [0, 1, 2]);
    assert_eq!(sim.saves(), 3);
    // The increment-zero snapshot already carries the initial
    // condition.
    assert!(captures[0].data.iter().all(|&v| v == 1.0));
    assert_eq!(captures[0].data.len(), 24);
}

#[test]
fn stepping_past_the_end_is_rejected() {
    let mut sim = harness(SaveSchedule::Never, 2.0);
    sim.step().unwrap();
    sim.step().unwrap();
    assert!(sim.done());
    assert!(matches!(sim.step().unwrap_err(), SimulatorError::AlreadyDone));
}

#[test]
fn unknown_writer_field_surfaces_at_write_time() {
    let mut sim = harness(SaveSchedule::EveryIncrement, 2.0);
    sim.add_results_writer("missing", Box::new(RecordingWriter::new()))
        .unwrap();
    match sim.step().unwrap_err() {
        SimulatorError::Model(ModelError::UnknownField { name }) => {
            assert_eq!(name, "missing");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn metrics_track_saves_and_total_time() {
    let mut sim = harness(SaveSchedule::EveryIncrement, 2.0);
    sim.add_results_writer("phi", Box::new(RecordingWriter::new()))
        .unwrap();
    sim.step().unwrap();
    assert_eq!(sim.metrics().saves, 2);
    sim.step().unwrap();
    assert_eq!(sim.metrics().saves, 3);
}
