use aam_core::analyze;

const SAMPLE: &str = "\
name = Arthur
hp = 100

@type speed = physics::meterPerSecond

@schema Player {
  name: string,
  hp: i32,
  vel: speed
}
";

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let (source, file_name) = match args.get(1) {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(source) => (source, path.clone()),
            Err(err) => {
                eprintln!("failed to read {path}: {err}");
                std::process::exit(1);
            }
        },
        None => (SAMPLE.to_string(), "sample.aam".to_string()),
    };

    let analysis = analyze(&source, &file_name);

    match analysis.to_json() {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("serialization failed: {err}"),
    }

    if analysis.diagnostics.is_empty() {
        println!("{file_name}: no findings");
    } else {
        eprint!("{}", analysis.format_diagnostics());
        eprintln!("{}", analysis.render_reports());
    }
}
