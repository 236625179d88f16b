/*
** This file is a part of Chunkxml (incremental XML reader/writer)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Chunkxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::env;
use std::fs::File;
use std::io::Read;
use std::io::stdin;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use chunkxml::DEFAULT_CAPACITY;
use chunkxml::DEFAULT_MAX_DEPTH;
use chunkxml::Document;
use chunkxml::DocumentError;
use chunkxml::DocumentOptions;
use chunkxml::Element;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_BUFFER_SIZE: usize = 4 * 1024;

fn print_version() {
    println!("xmlchunk (chunkxml) v{}", VERSION);
}

fn print_usage() {
    println!(
        concat!(
            "Usage: xmlchunk [OPTIONS] [FILE.xml...]\n",
            "This tool parses XML documents in chunks and prints the element tree.\n",
            "Options:\n",
            "  -x, --serialize        Print the serialized document instead of the tree\n",
            "  -b, --buffer <SIZE>    File read buffer size in bytes (default: {})\n",
            "  -c, --capacity <SIZE>  Document arena size in bytes (default: {})\n",
            "  -d, --depth <LEVELS>   Maximum element nesting (default: {})\n",
            "  -h, --help             Display this help message and exit\n",
            "  -v, --version          Display the version and exit\n",
            "Log output is controlled with the RUST_LOG environment variable."
        ),
        DEFAULT_BUFFER_SIZE, DEFAULT_CAPACITY, DEFAULT_MAX_DEPTH
    );
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn depth_of(element: &Element) -> usize {
    let mut depth = 0;
    let mut parent = element.parent();
    while let Some(p) = parent {
        depth += 1;
        parent = p.parent();
    }
    depth
}

fn print_tree(doc: &Document) {
    for (name, value) in doc.header() {
        println!("header {}: {}", name, value);
    }
    for element in doc.elements() {
        let mut line = "  ".repeat(depth_of(&element));
        if let Some(ns) = element.namespace() {
            line.push_str(ns);
            line.push(':');
        }
        line.push_str(element.name());
        for (name, value) in element.attributes() {
            line.push_str(&format!(" {}=\"{}\"", name, value));
        }
        if let Some(text) = element.text() {
            line.push_str(&format!(" text: {:?}", text));
        }
        println!("{}", line);
    }
    let stats = doc.arena_stats();
    println!("arena used: {} of {} bytes", stats.used, stats.capacity);
}

enum ToolError {
    IoError(std::io::Error),
    DocumentError(DocumentError),
    Incomplete,
}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        ToolError::IoError(err)
    }
}

impl From<DocumentError> for ToolError {
    fn from(err: DocumentError) -> Self {
        ToolError::DocumentError(err)
    }
}

struct Tool {
    doc: Document,
    buffer_size: usize,
    serialize: bool,
}

impl Tool {
    fn new(
        options: DocumentOptions,
        buffer_size: usize,
        serialize: bool,
    ) -> Result<Self, DocumentError> {
        Ok(Tool {
            doc: Document::with_options(options)?,
            buffer_size,
            serialize,
        })
    }

    fn parse_file(&mut self, file: &str, is_stream: bool) -> Result<(), ToolError> {
        let mut f: Box<dyn Read> = if is_stream {
            Box::new(stdin())
        } else {
            Box::new(File::open(file)?)
        };
        let mut buffer = vec![0u8; self.buffer_size];
        loop {
            let bytes_read = f.read(&mut buffer)?;
            if bytes_read == 0 {
                break;
            }
            self.doc.parse_bytes(&buffer[..bytes_read])?;
        }
        if !self.doc.is_complete() {
            return Err(ToolError::Incomplete);
        }
        Ok(())
    }

    fn print(&mut self) -> Result<(), DocumentError> {
        if self.serialize {
            println!("{}", self.doc.serialize()?);
        } else {
            print_tree(&self.doc);
        }
        Ok(())
    }

    fn process_file(&mut self, file: &str, is_stream: bool) -> bool {
        self.doc.reset();
        let result = match self.parse_file(file, is_stream) {
            Ok(()) => self.print().map_err(ToolError::DocumentError),
            Err(err) => Err(err),
        };
        match result {
            Ok(()) => true,
            Err(ToolError::IoError(e)) => {
                eprintln!("Error reading file '{}': {}", file, e);
                false
            }
            Err(ToolError::DocumentError(DocumentError::NoMemory)) => {
                let stats = self.doc.arena_stats();
                eprintln!(
                    "Document '{}' does not fit into {} bytes, try a larger --capacity",
                    file, stats.capacity
                );
                false
            }
            Err(ToolError::DocumentError(e)) => {
                let location = self.doc.location();
                eprintln!(
                    "Error in file '{}' at line {} column {}: {}",
                    file, location.lines, location.column, e
                );
                false
            }
            Err(ToolError::Incomplete) => {
                eprintln!("Document '{}' ends before all elements are closed", file);
                false
            }
        }
    }
}

fn parse_size(value: Option<String>, what: &str) -> Result<usize, ExitCode> {
    let Some(value) = value else {
        eprintln!("Missing {}", what);
        return Err(ExitCode::FAILURE);
    };
    match value.parse::<usize>() {
        Ok(size) if size > 0 => Ok(size),
        _ => {
            eprintln!("Invalid {}", what);
            Err(ExitCode::FAILURE)
        }
    }
}

fn main() -> ExitCode {
    let mut args = env::args();

    let mut files = Vec::new();
    let mut serialize = false;
    let mut buffer_size = DEFAULT_BUFFER_SIZE;
    let mut options = DocumentOptions::new();

    // Skip the first argument (program name)
    args.next();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-x" | "--serialize" => {
                serialize = true;
            }
            "-b" | "--buffer" => match parse_size(args.next(), "buffer size") {
                Ok(size) => buffer_size = size,
                Err(code) => return code,
            },
            "-c" | "--capacity" => match parse_size(args.next(), "capacity") {
                Ok(size) => options = options.capacity(size),
                Err(code) => return code,
            },
            "-d" | "--depth" => match parse_size(args.next(), "depth") {
                Ok(depth) => options = options.max_depth(depth),
                Err(code) => return code,
            },
            "-h" | "--help" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            "-v" | "--version" => {
                print_version();
                return ExitCode::SUCCESS;
            }
            _ => {
                files.push(arg);
            }
        }
    }

    init_logging();

    let mut tool = match Tool::new(options, buffer_size, serialize) {
        Ok(tool) => tool,
        Err(e) => {
            eprintln!("Cannot create the document: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if files.is_empty() {
        if !tool.process_file("stdin", true) {
            return ExitCode::FAILURE;
        }
    } else {
        for file in files {
            if !tool.process_file(&file, false) {
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
