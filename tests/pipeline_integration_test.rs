//! End-to-end checks: codec → dataset → training → prediction, plus rendering.

use segment_nn::predict::{predict_all, predict_pattern};
use segment_nn::train::train_with_report;
use segment_nn::{
    build_inputs, build_targets, build_training_set, decode, encode, predict, render, train,
    train_digits, Backend, DenseTrainer, Digit, ModelFactory, OptimizerKind, Parameters,
    SegmentError, TrainOptions, Trainer,
};

const TOLERANCE: f64 = 1e-9;

fn quick_options(seed: u64) -> TrainOptions {
    TrainOptions::default().passes(400).learning_rate(0.01).seed(seed)
}

#[test]
fn codec_scenarios() {
    assert_eq!(encode(1).unwrap().bits(), [0, 0, 1, 0, 0, 1, 0]);
    assert_eq!(decode(&[0u8, 0, 1, 0, 0, 1, 0]).unwrap().value(), 1);
    assert_eq!(encode(8).unwrap().bits(), [1, 1, 1, 1, 1, 1, 1]);
    assert_eq!(decode(&[1u8, 1, 1, 1, 1, 1, 1]).unwrap().value(), 8);
    assert!(matches!(decode(&[0u8; 7]), Err(SegmentError::UnknownPattern(_))));
}

#[test]
fn dataset_matches_codec() {
    let inputs = build_inputs();
    let targets = build_targets();
    for digit in Digit::all() {
        assert_eq!(inputs[digit.index()], digit.pattern().bits());
        assert_eq!(targets[digit.index()], digit.one_hot());
    }
}

#[test]
fn trained_network_reads_every_digit() {
    let model = ModelFactory::build(&[16]).unwrap();
    let (params, report) = train_digits(&model, &quick_options(7)).unwrap();
    assert_eq!(report.passes_run, 400);
    assert_eq!(report.final_accuracy, 1.0);

    for (digit, dist) in predict_all(&model, &params).unwrap() {
        assert_eq!(dist.argmax(), digit, "digit {digit} misread");
        assert!(dist.probability(digit) > 0.5);
    }
}

#[test]
fn direct_softmax_model_also_learns() {
    let model = ModelFactory::build(&[]).unwrap();
    assert_eq!(model.hidden_layer_count(), 0);
    let (params, _) = train_digits(&model, &quick_options(3)).unwrap();
    for digit in 0..10 {
        assert_eq!(predict(&model, &params, digit).unwrap().argmax().value() as i64, digit);
    }
}

#[test]
fn predictions_are_distributions() {
    let (inputs, targets) = build_training_set().as_f64();
    for hidden in [&[][..], &[5][..], &[12, 6][..]] {
        let model = ModelFactory::build(hidden).unwrap();
        let options = TrainOptions::default().passes(10).seed(1);
        let params = train(&model, &inputs, &targets, &options).unwrap();
        for digit in 0..10 {
            let dist = predict(&model, &params, digit).unwrap();
            let probs = dist.as_slice();
            assert_eq!(probs.len(), 10);
            assert!(probs.iter().all(|&p| p >= 0.0));
            assert!((probs.iter().sum::<f64>() - 1.0).abs() < TOLERANCE);
        }
    }
}

#[test]
fn backends_agree_on_training_and_inference() {
    let model = ModelFactory::build(&[8]).unwrap();
    let (inputs, targets) = build_training_set().as_f64();
    let sequential = train(&model, &inputs, &targets, &TrainOptions::default().passes(30).seed(21)).unwrap();
    let parallel = train(
        &model,
        &inputs,
        &targets,
        &TrainOptions::default().passes(30).seed(21).backend(Backend::Parallel),
    )
    .unwrap();

    for (a, b) in sequential.layers().iter().zip(parallel.layers()) {
        for (row_a, row_b) in a.weights.data.iter().zip(&b.weights.data) {
            for (x, y) in row_a.iter().zip(row_b) {
                assert!((x - y).abs() < 1e-9);
            }
        }
    }

    let pattern = encode(5).unwrap();
    let seq = predict_pattern(&DenseTrainer::new(Backend::Sequential), &model, &sequential, &pattern).unwrap();
    let par = predict_pattern(&DenseTrainer::new(Backend::Parallel), &model, &sequential, &pattern).unwrap();
    for (x, y) in seq.as_slice().iter().zip(par.as_slice()) {
        assert!((x - y).abs() < 1e-12);
    }
}

#[test]
fn one_architecture_many_parameter_snapshots() {
    let model = ModelFactory::build(&[6]).unwrap();
    let (first, _) = train_digits(&model, &TrainOptions::default().passes(5).seed(1)).unwrap();
    let (second, _) = train_digits(&model, &TrainOptions::default().passes(5).seed(2)).unwrap();
    assert_ne!(first, second);
    assert!(predict(&model, &first, 4).is_ok());
    assert!(predict(&model, &second, 4).is_ok());
}

#[test]
fn sgd_option_is_honoured() {
    let model = ModelFactory::build(&[10]).unwrap();
    let (inputs, targets) = build_training_set().as_f64();
    let options = TrainOptions::default()
        .optimizer(OptimizerKind::Sgd)
        .learning_rate(0.1)
        .passes(300)
        .seed(8);
    let (_, report) = train_with_report(&model, &inputs, &targets, &options).unwrap();
    assert!(report.loss_history[299] < report.loss_history[0]);
}

#[test]
fn trainer_contract_shape_errors() {
    let model = ModelFactory::build(&[4]).unwrap();
    let other = ModelFactory::build(&[5]).unwrap();
    let params = Parameters::initialize(&other, &mut rand::thread_rng());
    let trainer = DenseTrainer::default();
    assert!(matches!(
        trainer.infer(&model, &params, &[0.0; 7]),
        Err(SegmentError::ShapeMismatch { .. })
    ));
    assert!(matches!(ModelFactory::build(&[-1]), Err(SegmentError::InvalidArchitecture(_))));
}

#[test]
fn rendering_follows_the_pattern() {
    let svg = render(encode(7).unwrap().as_slice(), Some("scale(0.5)")).unwrap();
    assert_eq!(svg.matches("<path").count(), 7);
    assert_eq!(svg.matches(" on\"").count(), 3);
    assert!(svg.contains(r#"transform="scale(0.5)""#));
    assert!(matches!(render(&[1u8; 6], None), Err(SegmentError::InvalidPatternLength(6))));
}
