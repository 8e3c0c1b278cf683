use clap::Parser;

/// Computes the consensus ranking of a voting room with the skating system.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The JSON snapshot of the room: its objects and the rankings of its participants.
    /// For more information about the file format, read the documentation of the skating_ranking crate.
    #[clap(short, long, value_parser)]
    pub config: String,

    /// (file path) A reference file containing the expected results in JSON format. If provided, roomrank will
    /// check that the computed results match the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the results will be written in JSON format to the given
    /// location. By default, they are written to the standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
