use clap::Parser;
use dyntree::data::loader;
use dyntree::data::point_set::RealNumber;
use dyntree::evaluation::Evaluation;
use dyntree::trees::classifier::DynamicTreeClassifier;
use dyntree::trees::params::TreeParams;
use std::error::Error;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(
    about = "Train and evaluate a fully dynamic decision tree on a csv dataset.",
    version
)]
struct Options {
    /// path to the csv dataset, header row expected, label in the last column
    file_path: PathBuf,
    /// initial depth budget of the tree
    #[arg(long, default_value_t = 5)]
    height: u16,
    /// minimum number of points per child of a split
    #[arg(long, default_value_t = 3)]
    min_split_points: usize,
    /// fraction of the dataset used for training, the rest is held out
    #[arg(long, default_value_t = 0.8)]
    tree_size_proportion: f64,
    /// rebuild-amortization threshold; zero rebuilds on every update
    #[arg(long, default_value_t = 0.0)]
    beta: f64,
    /// evaluate online: decide each held-out point, insert it, retire the oldest
    #[arg(long)]
    fudyadt: bool,
    /// shuffle the dataset with this seed before the train/held-out split
    #[arg(long)]
    shuffle_seed: Option<u64>,
    /// dump the final tree before reporting the score
    #[arg(long)]
    print_tree: bool,
}

fn run(options: &Options) -> Result<(), Box<dyn Error>> {
    let points = loader::load_csv(&options.file_path)?;

    let mut params = TreeParams::new();
    params.set_height(options.height);
    params.set_min_split_points(options.min_split_points)?;
    params.set_beta(options.beta)?;

    let evaluation = Evaluation::with_options(
        params,
        options.tree_size_proportion,
        options.fudyadt,
        options.shuffle_seed,
    )?;
    let (f1, tree) = evaluation.run(points)?;

    if options.print_tree {
        print_tree(&tree);
    }
    println!("F1 score: {}", f1);
    Ok(())
}

fn print_tree<T: RealNumber>(tree: &DynamicTreeClassifier<T>) {
    if let Some(root) = tree.root() {
        root.walk(&mut |depth, node| {
            let indent = "  ".repeat(depth);
            match node.split() {
                Some(split) => println!("{}[{} points] {}", indent, node.n_points(), split),
                None => println!(
                    "{}[{} points] leaf -> {}",
                    indent,
                    node.n_points(),
                    node.majority()
                ),
            }
        });
    }
}

fn main() {
    let options = Options::parse();
    if let Err(err) = run(&options) {
        eprintln!("{}", err);
        process::exit(1);
    }
}
