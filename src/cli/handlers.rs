// FILE: src/cli/handlers.rs
use crate::{
    compile_sources, compile_to_directory, discover_sources, CompilationStats, NamespaceDecision,
    Result, SourceDocument,
};
use super::Cli;
use clap::ArgMatches;

fn collect_sources(cli: &Cli, matches: &ArgMatches) -> Result<Vec<SourceDocument>> {
    let mut sources = Vec::new();
    for (platform, dir) in cli.input_directories(matches)? {
        let found = discover_sources(&dir, platform)?;
        println!("📂 {} GIR files for {} in {}", found.len(), platform, dir.display());
        sources.extend(found);
    }
    Ok(sources)
}

// --- COMPILE ---
pub fn handle_compile_command(cli: &Cli, matches: &ArgMatches) -> Result<()> {
    let options = cli.build_compiler_options(matches)?;
    let output_dir = cli.output_directory(matches);
    let sources = collect_sources(cli, matches)?;

    println!("🔨 Compiling {} documents -> {}", sources.len(), output_dir.display());

    let stats = compile_to_directory(&sources, &output_dir, &options)?;

    println!("✅ Compilation successful!");
    println!("   Namespaces: {}", stats.namespace_count);
    println!("   Types: {}", stats.type_count);
    println!("   Skipped: {}", stats.skipped_count);
    println!("   Time: {}ms", cli.elapsed_ms());

    if matches.get_flag("stats") {
        print_detailed_stats(&stats)?;
    }

    Ok(())
}

// --- CHECK ---
pub fn handle_check_command(cli: &Cli, matches: &ArgMatches) -> Result<()> {
    let options = cli.build_compiler_options(matches)?;
    let sources = collect_sources(cli, matches)?;

    println!("🔍 Checking {} documents", sources.len());

    let (decisions, stats) = compile_sources(&sources, &options)?;
    for ns in &decisions {
        print_namespace_report(ns);
    }

    if stats.skipped_count == 0 {
        println!("✅ No declarations skipped");
    } else {
        println!("⚠️  {} declarations skipped", stats.skipped_count);
    }
    println!("   Unresolved documentation links: {}", stats.doc_misses);

    Ok(())
}

fn print_namespace_report(ns: &NamespaceDecision) {
    let suppressed = ns.callables().filter(|m| m.is_suppressed()).count();
    println!(
        "📦 {} {} ({}): {} types, {} functions, {} constants, {} suppressed",
        ns.name,
        ns.version,
        ns.package,
        ns.types.len(),
        ns.functions.len(),
        ns.constants.len(),
        suppressed
    );
    for skipped in &ns.skipped {
        println!("   ❌ {}: {}", skipped.name, skipped.reason);
    }
}

fn print_detailed_stats(stats: &CompilationStats) -> Result<()> {
    println!("\n📊 Detailed Statistics:");
    println!("{}", serde_json::to_string_pretty(stats)?);
    Ok(())
}
