use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_abs_diff_eq;

use percept_neu::prelude::*;

#[test]
fn empty_neuron_defaults() {
    let neuron = Neuron::new(Activation::Sigmoid);

    assert_eq!(neuron.factors_size(), 0);
    assert!(!neuron.bias_enabled());
    assert_eq!(neuron.delta(), 0.0);
    assert_eq!(neuron.output(), 0.0);
}

#[test]
fn with_size_sets_parameters() {
    let neuron = Neuron::with_size(Activation::Sigmoid, 3, true);

    assert_eq!(neuron.factors_size(), 3);
    assert!(neuron.bias_enabled());
}

#[test]
fn resize_zero_fills_every_vector() {
    let mut neuron = Neuron::sigmoid(2, false);
    neuron.set_factor(0, 4.5).unwrap();
    neuron.set_factor(1, -2.0).unwrap();

    for size in 0..25 {
        neuron.resize(size);
        assert_eq!(neuron.factors_size(), size);

        for i in 0..size {
            assert_eq!(neuron.factor(i).unwrap(), 0.0);
            assert_eq!(neuron.factor_change(i).unwrap(), 0.0);
            assert_eq!(neuron.last_factor_change(i).unwrap(), 0.0);
        }
    }
}

#[test]
fn set_factor_shifts_bookkeeping() {
    let mut neuron = Neuron::sigmoid(1, false);

    neuron.set_factor(0, 3.0).unwrap();
    neuron.set_factor(0, 2.0).unwrap();
    neuron.set_factor(0, 1.0).unwrap();

    assert_eq!(neuron.factor(0).unwrap(), 1.0);
    assert_eq!(neuron.factor_change(0).unwrap(), 2.0);
    assert_eq!(neuron.last_factor_change(0).unwrap(), 3.0);
}

#[test]
fn set_factor_out_of_range_fails() {
    let mut neuron = Neuron::sigmoid(2, false);

    let res = neuron.set_factor(5, 1.0);
    assert_eq!(res, Err(NetworkError::IndexOutOfRange { index: 5, len: 2 }));
}

#[test]
fn set_factors_shifts_bookkeeping() {
    let mut neuron = Neuron::sigmoid(3, false);

    neuron.set_factors(&[3.0, 3.0, 3.0]);
    neuron.set_factors(&[2.0, 2.0, 2.0]);
    neuron.set_factors(&[1.0, 1.0, 1.0]);

    for i in 0..3 {
        assert_eq!(neuron.factor(i).unwrap(), 1.0);
        assert_eq!(neuron.factor_change(i).unwrap(), 2.0);
        assert_eq!(neuron.last_factor_change(i).unwrap(), 3.0);
    }
}

#[test]
fn set_factors_with_new_length_resizes_history() {
    let mut neuron = Neuron::sigmoid(3, false);

    neuron.set_factors(&[3.0, 3.0, 3.0]);
    neuron.set_factors(&[2.0, 2.0, 2.0]);
    neuron.set_factors(&[1.0, 1.0, 1.0]);

    neuron.set_factors(&[9.0, 9.0, 9.0, 9.0, 9.0]);

    assert_eq!(neuron.factors_size(), 5);
    assert_eq!(neuron.factor_changes().len(), 5);
    assert_eq!(neuron.last_factor_changes().len(), 5);

    // Surviving slots shift as usual, new slots start with a zero history.
    assert_eq!(neuron.factor(0).unwrap(), 9.0);
    assert_eq!(neuron.factor_change(0).unwrap(), 1.0);
    assert_eq!(neuron.last_factor_change(0).unwrap(), 2.0);

    assert_eq!(neuron.factor(4).unwrap(), 9.0);
    assert_eq!(neuron.factor_change(4).unwrap(), 0.0);
    assert_eq!(neuron.last_factor_change(4).unwrap(), 0.0);
}

#[test]
fn enable_bias_allows_setting_it() {
    let mut neuron = Neuron::new(Activation::Sigmoid);

    neuron.enable_bias();
    neuron.set_bias(12.25);

    assert!(neuron.bias_enabled());
    assert_eq!(neuron.bias(), 12.25);
}

#[test]
fn disabled_bias_reads_as_zero_but_keeps_its_value() {
    let mut neuron = Neuron::sigmoid(3, true);
    neuron.set_bias(5.0);

    neuron.disable_bias();
    assert!(!neuron.bias_enabled());
    assert_eq!(neuron.bias(), 0.0);
    assert_eq!(neuron.bias_change(), 0.0);
    assert_eq!(neuron.last_bias_change(), 0.0);

    // The stored value is inert, not cleared.
    neuron.enable_bias();
    assert_eq!(neuron.bias(), 5.0);
}

#[test]
fn set_bias_is_noop_while_disabled() {
    let mut neuron = Neuron::new(Activation::Sigmoid);

    neuron.set_bias(5.0);
    neuron.enable_bias();

    assert_eq!(neuron.bias(), 0.0);
}

#[test]
fn set_bias_shifts_bookkeeping() {
    let mut neuron = Neuron::sigmoid(1, true);

    neuron.set_bias(3.0);
    neuron.set_bias(2.0);
    neuron.set_bias(1.0);

    assert_eq!(neuron.bias(), 1.0);
    assert_eq!(neuron.bias_change(), 2.0);
    assert_eq!(neuron.last_bias_change(), 3.0);
}

#[test]
fn reset_changes_zeroes_pending_only() {
    let mut neuron = Neuron::sigmoid(1, true);

    neuron.add_factor_change(0, 2.0).unwrap();
    neuron.add_bias_change(1.5);
    neuron.apply_changes(1.0, 0.0);

    neuron.add_factor_change(0, 4.0).unwrap();
    neuron.add_bias_change(3.0);
    neuron.reset_changes();

    assert_eq!(neuron.factor_change(0).unwrap(), 0.0);
    assert_eq!(neuron.bias_change(), 0.0);

    // The already applied changes stay remembered for momentum.
    assert_eq!(neuron.last_factor_change(0).unwrap(), 2.0);
    assert_eq!(neuron.last_bias_change(), 1.5);
}

#[test]
fn apply_changes_accumulated_arithmetic() {
    let mut neuron = Neuron::sigmoid(2, true);

    neuron.add_factor_change(0, 0.5).unwrap();
    neuron.add_factor_change(0, 0.5).unwrap();
    neuron.add_factor_change(1, 1.5).unwrap();
    neuron.add_factor_change(1, 1.5).unwrap();

    neuron.add_bias_change(45.0);
    neuron.add_bias_change(5.0);
    neuron.add_bias_change(-12.5);

    neuron.apply_changes(1.0, 1.0);

    assert_abs_diff_eq!(neuron.factor(0).unwrap(), -1.0);
    assert_abs_diff_eq!(neuron.factor(1).unwrap(), -3.0);
    assert_abs_diff_eq!(neuron.last_factor_change(0).unwrap(), 1.0);
    assert_abs_diff_eq!(neuron.last_factor_change(1).unwrap(), 3.0);

    assert_abs_diff_eq!(neuron.bias(), -37.5);
    assert_abs_diff_eq!(neuron.last_bias_change(), 37.5);
    assert_eq!(neuron.bias_change(), 0.0);
    assert_eq!(neuron.factor_change(0).unwrap(), 0.0);
}

#[test]
fn apply_changes_uses_momentum() {
    let mut neuron = Neuron::sigmoid(1, false);

    neuron.add_factor_change(0, 1.0).unwrap();
    neuron.apply_changes(0.9, 0.1);

    // First step has no momentum history yet.
    assert_abs_diff_eq!(neuron.factor(0).unwrap(), -0.9, epsilon = 1e-12);
    assert_abs_diff_eq!(neuron.last_factor_change(0).unwrap(), 0.9, epsilon = 1e-12);

    neuron.add_factor_change(0, 0.5).unwrap();
    neuron.apply_changes(0.9, 0.1);

    // effective = 0.9 * 0.5 + 0.1 * 0.9 * 0.9
    assert_abs_diff_eq!(neuron.factor(0).unwrap(), -0.9 - 0.531, epsilon = 1e-12);
    assert_abs_diff_eq!(neuron.last_factor_change(0).unwrap(), 0.531, epsilon = 1e-12);
}

#[test]
fn refresh_from_input_vector() {
    let input = [1.0, -2.0, 1.5];
    let mut neuron = Neuron::sigmoid(input.len(), false);

    for i in 0..neuron.factors_size() {
        neuron.set_factor(i, 1.0).unwrap();
    }

    neuron.refresh_inputs(&input).unwrap();
    assert_abs_diff_eq!(neuron.output(), 0.62245933120, epsilon = 1e-10);
}

#[test]
fn bias_affects_the_output() {
    let input = [1.0, -2.0, 1.5];
    let mut neuron = Neuron::sigmoid(input.len(), false);

    for i in 0..neuron.factors_size() {
        neuron.set_factor(i, 1.0).unwrap();
    }

    neuron.enable_bias();
    neuron.set_bias(2.5);

    neuron.refresh_inputs(&input).unwrap();
    assert_abs_diff_eq!(neuron.output(), 0.95257412682, epsilon = 1e-10);
}

#[test]
fn factors_affect_the_output() {
    let input = [1.0, -2.0, 1.5];
    let mut neuron = Neuron::sigmoid(input.len(), false);

    for i in 0..neuron.factors_size() {
        neuron.set_factor(i, 1.0).unwrap();
    }

    neuron.set_factor(0, 0.5).unwrap();
    neuron.set_factor(2, -0.5).unwrap();

    neuron.refresh_inputs(&input).unwrap();
    assert_abs_diff_eq!(neuron.output(), 0.09534946489, epsilon = 1e-10);
}

fn upstream_layer() -> Vec<NeuronRef> {
    let input = [1.0, -2.0, 1.5];
    let mut layer = Vec::new();

    for _ in 0..2 {
        let mut n = Neuron::sigmoid(input.len(), false);
        for i in 0..n.factors_size() {
            n.set_factor(i, 1.0).unwrap();
        }
        n.refresh_inputs(&input).unwrap();

        layer.push(Rc::new(RefCell::new(n)));
    }

    layer
}

#[test]
fn refresh_from_neuron_layer() {
    let upstream = upstream_layer();
    let mut neuron = Neuron::sigmoid(upstream.len(), false);

    neuron.set_factor(0, 1.0).unwrap();
    neuron.set_factor(1, 1.0).unwrap();

    neuron.refresh_layer(&upstream).unwrap();
    assert_abs_diff_eq!(neuron.output(), 0.77641901805, epsilon = 1e-10);
}

#[test]
fn bias_affects_the_layer_output() {
    let upstream = upstream_layer();
    let mut neuron = Neuron::sigmoid(upstream.len(), false);

    neuron.set_factor(0, 1.0).unwrap();
    neuron.set_factor(1, 1.0).unwrap();

    neuron.enable_bias();
    neuron.set_bias(-1.75);

    neuron.refresh_layer(&upstream).unwrap();
    assert_abs_diff_eq!(neuron.output(), 0.37634728076, epsilon = 1e-10);
}

#[test]
fn factors_affect_the_layer_output() {
    let upstream = upstream_layer();
    let mut neuron = Neuron::sigmoid(upstream.len(), false);

    neuron.set_factor(0, 0.5).unwrap();
    neuron.set_factor(1, -0.95).unwrap();

    neuron.refresh_layer(&upstream).unwrap();
    assert_abs_diff_eq!(neuron.output(), 0.43042761756, epsilon = 1e-10);
}

#[test]
fn refresh_rejects_mismatched_lengths() {
    let mut neuron = Neuron::sigmoid(2, false);

    let res = neuron.refresh_inputs(&[1.0]);
    assert_eq!(res, Err(NetworkError::ShapeMismatch { expected: 2, found: 1 }));

    let upstream = upstream_layer(); // 2 neurons
    neuron.resize(3);
    let res = neuron.refresh_layer(&upstream);
    assert_eq!(res, Err(NetworkError::ShapeMismatch { expected: 3, found: 2 }));
}
