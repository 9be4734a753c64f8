use failure::{Error, ResultExt};

use crate::{
    args::InfoArgs,
    commands::{open_reader, print_header},
};


pub fn run(args: &InfoArgs) -> Result<(), Error> {
    let mut reader = open_reader(&args.file)?;
    print_header(reader.header());
    println!();

    if args.read_body {
        let names: Vec<_> = reader.header().elements.iter()
            .map(|e| e.name.clone())
            .collect();

        progress!(["Reading body of '{}'", args.file.display()] => {
            for name in &names {
                // Only checks the data, nothing is stored.
                reader.element::<()>(name)?
                    .read_all()
                    .context(format!("invalid data in element '{}'", name))?;
            }
            reader.close()?;
        });
        info!("All element data is valid");
    }

    Ok(())
}
