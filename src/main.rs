use clap::{App, Arg, ArgAction};

use env_logger::Env;

use log::{info, warn};

use std::time::Instant;

use percept_neu::dataloader::{DataLoader, PlainTextDataset};
use percept_neu::err::NetworkError;
use percept_neu::network::Network;
use percept_neu::train_params::TrainParams;
use percept_neu::util::Float;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let matches = App::new("percept-neu trainer")
        .version("0.1.0")
        .about("Train and test a multilayer perceptron on plain text datasets")
        .arg(
            Arg::new("TrainData")
                .short('t')
                .long("train")
                .help("Path to the train dataset file")
                .action(ArgAction::Set)
                .required(true),
        )
        .arg(
            Arg::new("TestData")
                .short('T')
                .long("test")
                .help("Path to the test dataset file")
                .action(ArgAction::Set)
                .required(true),
        )
        .arg(
            Arg::new("Iter")
                .short('i')
                .long("iter")
                .help("Number of times the train dataset is backpropagated")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(usize))
                .default_value("1000"),
        )
        .arg(
            Arg::new("HiddenLayers")
                .short('l')
                .long("hidden_layers")
                .help("Number of hidden layers")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(usize))
                .default_value("1"),
        )
        .arg(
            Arg::new("HiddenNeurons")
                .short('n')
                .long("hidden_neurons")
                .help("Number of neurons per hidden layer")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(usize))
                .default_value("5"),
        )
        .arg(
            Arg::new("LearnRate")
                .short('e')
                .long("learn_rate")
                .help("Learning factor (aka eta)")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(f64))
                .default_value("0.9"),
        )
        .arg(
            Arg::new("Momentum")
                .short('m')
                .long("momentum")
                .help("Momentum factor (aka mu)")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(f64))
                .default_value("0.1"),
        )
        .arg(
            Arg::new("NoBias")
                .short('b')
                .long("no_bias")
                .help("Disable the neuron bias")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let train_path = matches.get_one::<String>("TrainData").unwrap();
    let test_path = matches.get_one::<String>("TestData").unwrap();
    let iterations = *matches.get_one::<usize>("Iter").unwrap();
    let hidden_layers = *matches.get_one::<usize>("HiddenLayers").unwrap();
    let hidden_neurons = *matches.get_one::<usize>("HiddenNeurons").unwrap();
    let learn_rate = *matches.get_one::<f64>("LearnRate").unwrap();
    let momentum = *matches.get_one::<f64>("Momentum").unwrap();
    let no_bias = *matches.get_one::<bool>("NoBias").unwrap();

    if train_path == test_path {
        warn!("Using the same file to train and test the network : {}", train_path);
    }

    let train_ds = PlainTextDataset::from_file(train_path)?;
    let test_ds = PlainTextDataset::from_file(test_path)?;

    if train_ds.elements() == 0 || test_ds.elements() == 0 {
        return Err(Box::new(NetworkError::InvalidFormat(
            "train and test datasets must not be empty".to_owned(),
        )));
    }

    if train_ds.inputs_length() != test_ds.inputs_length() {
        warn!(
            "Train inputs length {} differs from test inputs length {}",
            train_ds.inputs_length(),
            test_ds.inputs_length()
        );
    }

    info!("Train file : {} ({} elements)", train_path, train_ds.elements());
    info!("Test file : {} ({} elements)", test_path, test_ds.elements());
    info!("Iterations : {}", iterations);
    info!("Hidden layers : {}", hidden_layers);
    info!("Hidden neurons : {}", hidden_neurons);
    info!("Learning factor : {}", learn_rate);
    info!("Momentum factor : {}", momentum);
    info!("Bias : {}", !no_bias);

    let mut net = Network::new(hidden_layers, hidden_neurons, train_ds.outputs_length());
    net.set_train_params(TrainParams::new(learn_rate, momentum));

    // Size layer 0 before the factor init, feed only reshapes on a
    // length change.
    net.feed(train_ds.input(0)?);

    if !no_bias {
        net.set_bias_enabled(true)?;
    }

    net.randomize_factors(-0.1, 0.1)?;

    let now_time = Instant::now();

    for iter in 0..iterations {
        for element in 0..train_ds.elements() {
            net.backpropagate(train_ds.input(element)?, train_ds.expected(element)?)?;
        }

        if iter != 0 && iter % 100 == 0 {
            info!("Iteration {} of {}", iter, iterations);
        }
    }

    info!("Elapsed for training : {} ms", now_time.elapsed().as_millis());

    let mut err_sum = 0.0;

    for element in 0..test_ds.elements() {
        let out = net.output_for(test_ds.input(element)?)?;
        let expected = test_ds.expected(element)?;

        let mut local_err = 0.0;
        for (out_v, exp_v) in out.iter().zip(expected.iter()) {
            local_err += (exp_v - out_v) * (exp_v - out_v);
        }

        err_sum += local_err / out.len() as Float;
    }

    info!("Test MSE : {:.6}", err_sum / test_ds.elements() as Float);

    Ok(())
}
