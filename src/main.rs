use anyhow::Result;
use clap::{Parser, Subcommand};
use dircache::areas::repository::Repository;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dircache",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A content-addressed object store with a binary index",
    long_about = "Plumbing for a content-addressed object store: objects are \
    compressed, named by the SHA-1 of their contents and sharded into 256 directories, \
    while a checksummed binary index records the staged files.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init-db",
        about = "Create the .dircache directory and object store",
        long_about = "This command creates .dircache in the current directory. Unless DB_ENVIRONMENT \
        names an existing directory, it also creates .dircache/objects and its 256 shard directories."
    )]
    InitDb,
    #[command(
        name = "cat-file",
        about = "Dump the content of an object",
        long_about = "This command writes the payload of an object to a temporary file and prints \
        the file name and the object type. It requires the SHA of the object to be specified."
    )]
    CatFile {
        #[arg(short = 'p', long, help = "Print the payload instead of writing a temporary file")]
        print: bool,
        #[arg(index = 1, help = "The object SHA to read")]
        sha: String,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file and optionally write it to the object store",
        long_about = "This command hashes a file as an object and can write it to the object store. \
        It requires the path to the file to be specified."
    )]
    HashObject {
        #[arg(short, long, help = "Write the object to the object store")]
        write: bool,
        #[arg(short = 't', long = "type", default_value = "blob", help = "The object type")]
        object_type: String,
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(
        name = "commit-tree",
        about = "Create a commit object for a tree",
        long_about = "This command creates a commit object for the given tree, with the commit \
        message read from standard input, and prints its SHA."
    )]
    CommitTree {
        #[arg(index = 1, help = "The tree SHA")]
        tree: String,
        #[arg(short = 'p', long = "parent", help = "A parent commit SHA (repeatable)")]
        parents: Vec<String>,
    },
    #[command(
        name = "show-cache",
        about = "List the entries of the index",
        long_about = "This command loads and verifies the index and prints the mode, object SHA \
        and name of every entry."
    )]
    ShowCache,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let pwd = std::env::current_dir()?;
    let mut repository = Repository::new(&pwd, Box::new(std::io::stdout()))?;

    match &cli.command {
        Commands::InitDb => repository.init_db()?,
        Commands::CatFile { print, sha } => repository.cat_file(sha, *print)?,
        Commands::HashObject {
            write,
            object_type,
            file,
        } => repository.hash_object(file, object_type, *write)?,
        Commands::CommitTree { tree, parents } => {
            repository.commit_tree(tree, parents, std::io::stdin().lock())?;
        }
        Commands::ShowCache => repository.show_cache()?,
    }

    Ok(())
}
