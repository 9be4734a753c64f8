use std::time::Instant;

use failure::{bail, Error, ResultExt};
use plyio::{Header, Writer};

use crate::{
    args::ConvertArgs,
    commands::{open_reader, print_header},
};


pub fn run(args: &ConvertArgs) -> Result<(), Error> {
    let start_time = Instant::now();

    if args.target.exists() {
        if !args.force {
            bail!(
                "target file '{}' already exists (use '--force' to overwrite it)",
                args.target.display(),
            );
        }
        warn!("Overwriting '{}'", args.target.display());
    }

    // ----- Read everything --------------------------------------------------
    let mut reader = open_reader(&args.source)?;
    let source_header = reader.header().clone();
    if !args.no_info {
        print_header(&source_header);
        println!();
    }

    let elements = progress!(["Reading '{}'", args.source.display()] => {
        for def in &source_header.elements {
            reader.read_other_element(&def.name)
                .context(format!("failed to read element '{}'", def.name))?;
        }
        reader.close()?
    });

    // ----- Write it with the new encoding ----------------------------------
    let format = args.encoding.format();
    info!("Target format: {} (source: {})", format, source_header.format);

    let mut header = Header::new(format);
    header.version = source_header.version.clone();
    header.annotations = source_header.annotations.clone();

    let mut writer = Writer::create(&args.target, header)
        .context(format!("failed to create '{}'", args.target.display()))?;
    writer.declare_other_elements(&elements)?;
    writer.finish_header()?;

    progress!(["Writing '{}'", args.target.display()] => {
        writer.write_other_elements(&elements)?;
        writer.close()?;
    });

    info!("Processing time: {:.2?}", start_time.elapsed());

    Ok(())
}
