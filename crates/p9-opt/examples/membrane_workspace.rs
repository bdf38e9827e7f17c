//! End-to-end tour of a membrane workspace: build a small transformer-shaped
//! hierarchy, attach synthetic parameters, run every transformation pass,
//! and print the bookkeeping statistics.

use std::rc::Rc;

use p9_core::{
    Buffer, ComputeBackend, ComputeGraph, ElementType, ExecError, Membrane, MembraneStats,
    Namespace, NamespaceStats, QuantKind, Rule, RuleAction, RulePattern,
};
use p9_opt::{
    apply_data_free_quant, forward_tiled_quant, generate_synthetic_data, mixed_precision_quant,
    TilePassthrough, TransformConfig,
};

struct CpuBackend;

impl ComputeBackend for CpuBackend {
    fn execute(&self, graph: &ComputeGraph) -> Result<(), ExecError> {
        println!("executing graph '{}' ({} nodes)", graph.label(), graph.nodes());
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = p9_config::telemetry::init_tracing();

    let ns = Namespace::new("ml_workspace", Some(Rc::new(CpuBackend) as Rc<dyn ComputeBackend>));

    let root = Membrane::new("transformer_model", 0);
    let embedding = Membrane::new("embedding", 1);
    let attention = Membrane::new("attention", 1);
    let ffn = Membrane::new("ffn", 1);
    root.add_child(&embedding)?;
    root.add_child(&attention)?;
    root.add_child(&ffn)?;
    ns.set_root(&root);

    // Synthetic parameters; the allocating context (this function) keeps the
    // owning handles, the membranes only borrow.
    let mut buffers = Vec::new();
    for (membrane, len) in [
        (&embedding, 512 * 1000),
        (&embedding, 512 * 512),
        (&attention, 512 * 512),
        (&attention, 512 * 512),
        (&attention, 512 * 512),
        (&ffn, 512 * 2048),
        (&ffn, 2048 * 512),
    ] {
        let buffer = generate_synthetic_data(len, 0.05, None)?.into_ref();
        membrane.add_object(buffer.clone())?;
        buffers.push(buffer);
    }

    let config = TransformConfig::new(ElementType::Quantized(QuantKind::Q4), 0.05)
        .with_mixed_precision(true);
    let data_free = apply_data_free_quant(&root, &config)?;
    println!(
        "data-free pass: {} buffers, {} elements perturbed",
        data_free.buffers_processed, data_free.elements_touched
    );

    ffn.add_rule(Rule::new(
        RulePattern::Any,
        RuleAction::Clamp { min: -1.0, max: 1.0 },
    ))?;
    let evolved = root.evolve();
    println!(
        "evolution: {} nodes visited, {} rule applications",
        evolved.nodes_visited, evolved.rule_applications
    );

    let mixed = mixed_precision_quant(&root, 0.95)?;
    println!(
        "mixed precision: {} of {} buffers routed to quantized storage",
        mixed.quantized_count(),
        mixed.assignments.len()
    );

    let tiled = forward_tiled_quant(&root, &config, None, &mut TilePassthrough)?;
    println!("tiled pass: {} tiles processed", tiled.tiles_processed);

    ns.compute(&ComputeGraph::new("forward", 7))?;

    let total: usize = buffers.iter().map(|b| b.borrow().element_count()).sum();
    ns.set_total_params(total);
    ns.set_quantized_params(total);
    ns.set_compression_ratio(32.0 / 4.0);

    for membrane in [&root, &embedding, &attention, &ffn] {
        print!("{}", MembraneStats::collect(membrane));
    }
    print!("{}", NamespaceStats::collect(&ns));

    Ok(())
}
