//! Ranking of candidates
//!
//! Populations are kept sorted by fitness ascending, so the worst candidate
//! sits at index 0 and the best at the end. Replacement works from the
//! front and never touches the last slot.

use std::cmp::Ordering;

use league_core::Candidate;

/// Sort ascending by fitness (best last). Stable, so equal candidates keep
/// their relative order.
pub fn rank_population(population: &mut [Candidate]) {
    population.sort_by(|a, b| compare_fitness(a.fitness, b.fitness));
}

/// Best candidate of a ranked population
pub fn best_candidate(population: &[Candidate]) -> Option<&Candidate> {
    population.last()
}

/// Average fitness (0 for an empty population)
pub fn mean_fitness(population: &[Candidate]) -> f64 {
    if population.is_empty() {
        return 0.0;
    }
    population.iter().map(|c| c.fitness).sum::<f64>() / population.len() as f64
}

/// Indices of the top `n` candidates by fitness, best first.
///
/// Works on unranked populations too.
pub fn select_elite(population: &[Candidate], n: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..population.len()).collect();
    indices.sort_by(|&a, &b| compare_fitness(population[b].fitness, population[a].fitness));
    indices.truncate(n);
    indices
}

fn compare_fitness(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
