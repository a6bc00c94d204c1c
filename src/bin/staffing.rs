use staff_sim::cli::{self, Command, ExportArg, FormatArg};
use staff_sim::dispatch;
use staff_sim::engine::SimulationEngine;
use staff_sim::error::{Error, Result};
use staff_sim::export;
use staff_sim::output::{Formatter, HumanFormatter, JsonFormatter, SummaryFormatter};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::parse_args()?;
    match cli.command {
        Command::Staff(args) => {
            let request = cli::build_staffing_request(&args)?;
            dispatch::validate(&request)?;
            let formatter = formatter_for(args.format);
            let output = match args.agents {
                Some(agents) => {
                    let metrics =
                        dispatch::achievable(&request, agents).ok_or(Error::Infeasible)?;
                    formatter.achievable(&metrics)
                }
                None => {
                    let result = dispatch::plan(&request).ok_or(Error::Infeasible)?;
                    formatter.staffing(&result)
                }
            };
            print!("{}", output);
        }
        Command::Simulate(args) => {
            let config = cli::build_simulation_config(&args)?;
            let mut engine = SimulationEngine::new(config)?;
            let horizon = engine.config.horizon;
            match args.step {
                Some(step) if step > 0.0 => {
                    let mut target = 0.0;
                    while !engine.is_finished() {
                        target += step;
                        engine.process_until(target);
                    }
                }
                _ => engine.process_until(horizon),
            }

            let formatter = formatter_for(args.format);
            print!(
                "{}",
                formatter.simulation(&engine.config, &engine.snapshot())
            );
            match args.export {
                Some(ExportArg::Csv) => {
                    print!("{}", export::contact_table(engine.contact_records()));
                }
                Some(ExportArg::Sql) => {
                    for statement in export::historical_inserts(engine.contact_records()) {
                        println!("{};", statement);
                    }
                }
                None => {}
            }
        }
    }
    Ok(())
}

fn formatter_for(format: FormatArg) -> Box<dyn Formatter> {
    match format {
        FormatArg::Human => Box::new(HumanFormatter),
        FormatArg::Summary => Box::new(SummaryFormatter),
        FormatArg::Json => Box::new(JsonFormatter),
    }
}
