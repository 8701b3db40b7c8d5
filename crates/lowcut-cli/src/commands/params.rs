//! Parameter layout listing.

use clap::Args;
use lowcut_core::{FilterParameters, ParamFlags, ParameterInfo};

#[derive(Args)]
pub struct ParamsArgs {}

pub fn run(_args: ParamsArgs) -> anyhow::Result<()> {
    let layout = FilterParameters::default();

    println!("Parameters:");
    println!(
        "  {:<14} {:<8} {:>5}  {:<14} {:>20}  {:>10}  {:>6}  {}",
        "Name", "Short", "ID", "String ID", "Range", "Default", "Step", "Flags"
    );
    for i in 0..layout.param_count() {
        let Some(desc) = layout.param_info(i) else {
            continue;
        };
        let mut flags = Vec::new();
        if desc.flags.contains(ParamFlags::AUTOMATABLE) {
            flags.push("automatable");
        }
        if desc.flags.contains(ParamFlags::STEPPED) {
            flags.push("stepped");
        }
        println!(
            "  {:<14} {:<8} {:>5}  {:<14} {:>20}  {:>10}  {:>6}  {}",
            desc.name,
            desc.short_name,
            desc.id.0,
            desc.string_id,
            format!("{} .. {}", desc.format_value(desc.min), desc.format_value(desc.max)),
            desc.format_value(layout.get_param(i)),
            desc.step,
            flags.join(", ")
        );
    }
    println!("\nFilter order: {} (fixed)", layout.order);

    Ok(())
}
