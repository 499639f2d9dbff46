use clap::{Parser, Subcommand};

/// This is a tabulation program for interview answers extracted into JSON documents.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, global = true, takes_value = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Flattens a batch of JSON documents into the canonical table.
    Tabulate {
        /// (file path, optional) A JSON configuration file. Command line options take precedence
        /// over the values of this file.
        #[clap(short, long, value_parser)]
        config: Option<String>,

        /// (file pattern) The documents to tabulate, for example 'data/*/ai/*.json'. The
        /// wildcards '*', '?' and '[...]' are accepted in any component and do not match hidden
        /// files. Matching files are processed in alphabetical order.
        #[clap(short, long, value_parser)]
        input: Option<String>,

        /// (file path) Where to write the canonical table. Defaults to flattened_output.json.
        #[clap(short, long, value_parser)]
        out: Option<String>,

        /// (file path) A reference file containing an expected table. If provided, interviewtab
        /// will check that the tabulated output matches the reference.
        #[clap(short, long, value_parser)]
        reference: Option<String>,

        /// (file paths) Explicit list of documents, processed in the given order. Takes
        /// precedence over --input.
        #[clap(value_parser)]
        files: Vec<String>,
    },
    /// Renders the tables of a transcript (.docx or .xlsx) into text chunks.
    Chunk {
        #[clap(short, long, value_parser)]
        config: Option<String>,

        /// (file path) The transcript. Every table of a Word document, or every worksheet of a
        /// workbook, is read as one table.
        #[clap(short, long, value_parser)]
        input: String,

        /// (default 10000) Maximum number of characters of a chunk.
        #[clap(long, value_parser)]
        chunk_size: Option<usize>,

        /// (file path or empty) If specified, the chunks are written as a JSON list to this
        /// location instead of the standard output.
        #[clap(short, long, value_parser)]
        out: Option<String>,
    },
    /// Merges the replies of the extraction model into one input document.
    Merge {
        #[clap(short, long, value_parser)]
        config: Option<String>,

        /// (file path) The empty taxonomy: sections, groups and fields.
        #[clap(short, long, value_parser)]
        template: String,

        /// (file path) Where to write the merged document.
        #[clap(short, long, value_parser)]
        out: String,

        /// (file paths) The model replies, in chunk order.
        #[clap(value_parser, required = true)]
        replies: Vec<String>,
    },
}
