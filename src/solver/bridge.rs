use std::time::Instant;

use reqwest::blocking::Client;

use crate::api::solver_dto::{HealthResponseDto, SolverErrorDto, SolverRequestDto, SolverResponseDto};
use crate::domain::TaskId;
use crate::error::{Error, Result};
use crate::scheduler::Coalition;

use super::subset::MAX_AGENTS;

const DEFAULT_PORT: u16 = 8080;
const PORT_ENV_VAR: &str = "ODP_IP_SOLVER_PORT";

/// Blocking HTTP client for the coalition-structure solver: a plain
/// `reqwest::blocking` client, checked `status().is_success()`, with the
/// non-2xx body folded into a crate error rather than propagated raw.
#[derive(Debug)]
pub struct SolverClient {
    base_url: String,
    client: Client,
}

impl SolverClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), client: Client::new() }
    }

    /// Reads `ODP_IP_SOLVER_PORT` once (default `8080`) and targets
    /// `http://127.0.0.1:<port>`.
    pub fn from_env() -> Self {
        let port = std::env::var(PORT_ENV_VAR).ok().and_then(|v| v.parse::<u16>().ok()).unwrap_or(DEFAULT_PORT);
        Self::new(format!("http://127.0.0.1:{port}"))
    }

    pub fn health_check(&self) -> Result<bool> {
        let response = self.client.get(format!("{}/api/health", self.base_url)).send()?;
        if !response.status().is_success() {
            return Ok(false);
        }
        let body: HealthResponseDto = response.json()?;
        Ok(body.status == "ok")
    }

    /// Solves the coalition-structure generation problem for `coalition_values`
    /// (length `2^num_of_agents`) and resolves the response's 1-based
    /// partition into concrete `TaskId` coalitions over `agents`, where
    /// `agents[i]` is agent `i+1`.
    pub fn solve(&self, agents: &[TaskId], coalition_values: &[f64]) -> Result<Vec<Coalition>> {
        let num_of_agents = agents.len();
        if num_of_agents > MAX_AGENTS {
            return Err(Error::AgentCountOutOfBounds(num_of_agents));
        }
        let expected_len = 1usize << num_of_agents;
        if coalition_values.len() != expected_len {
            return Err(Error::SubsetLengthMismatch { got: coalition_values.len(), expected: expected_len });
        }

        let request = SolverRequestDto { num_of_agents, coalition_values: coalition_values.to_vec() };

        let started = Instant::now();
        let response = self.client.post(format!("{}/api/solve", self.base_url)).json(&request).send()?;
        let status = response.status();
        let elapsed_ms = started.elapsed().as_millis();

        if !status.is_success() {
            let details = response
                .json::<SolverErrorDto>()
                .map(|body| format!("{}: {}", body.error, body.details))
                .unwrap_or_else(|_| "solver returned a non-2xx response with an unparsable body".to_string());
            log::warn!("Coalition-structure solver request failed after {elapsed_ms}ms: {status} — {details}");
            return Err(Error::SolverResponseError { status: status.as_u16(), details });
        }

        let body: SolverResponseDto = response.json()?;
        log::info!("Coalition-structure solver solved {num_of_agents} agents in {elapsed_ms}ms (request-observed); solver-reported {}ms", body.time_ms);

        resolve_partition(agents, body.partition)
    }
}

/// Maps the solver's 1-based, disjoint-and-exhaustive partition onto
/// `agents`. Rejects any index outside
/// `[1, N]`, any index that appears in more than one coalition, and any
/// partition that does not cover every agent exactly once.
fn resolve_partition(agents: &[TaskId], partition: Vec<Vec<usize>>) -> Result<Vec<Coalition>> {
    let n = agents.len();
    let mut seen = vec![false; n];
    let mut coalitions = Vec::with_capacity(partition.len());

    for group in partition {
        let mut coalition = Coalition::with_capacity(group.len());
        for one_based in group {
            if one_based == 0 || one_based > n {
                return Err(Error::PartitionIndexOutOfBounds(one_based, n));
            }
            if seen[one_based - 1] {
                return Err(Error::PartitionIncomplete(n));
            }
            seen[one_based - 1] = true;
            coalition.push(agents[one_based - 1].clone());
        }
        coalitions.push(coalition);
    }

    if seen.iter().any(|&covered| !covered) {
        return Err(Error::PartitionIncomplete(n));
    }

    Ok(coalitions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agents(names: &[&str]) -> Vec<TaskId> {
        names.iter().map(|&n| TaskId::new(n)).collect()
    }

    #[test]
    fn resolve_partition_maps_one_based_indices_to_agents() {
        let agents = agents(&["A", "B", "C"]);
        let partition = vec![vec![1], vec![2, 3]];
        let coalitions = resolve_partition(&agents, partition).unwrap();
        assert_eq!(coalitions, vec![vec![TaskId::new("A")], vec![TaskId::new("B"), TaskId::new("C")]]);
    }

    #[test]
    fn resolve_partition_rejects_an_out_of_range_index() {
        let agents = agents(&["A", "B"]);
        let err = resolve_partition(&agents, vec![vec![1, 3]]).unwrap_err();
        assert!(matches!(err, Error::PartitionIndexOutOfBounds(3, 2)));
    }

    #[test]
    fn resolve_partition_rejects_a_partition_missing_an_agent() {
        let agents = agents(&["A", "B", "C"]);
        let err = resolve_partition(&agents, vec![vec![1, 2]]).unwrap_err();
        assert!(matches!(err, Error::PartitionIncomplete(3)));
    }

    #[test]
    fn resolve_partition_rejects_an_agent_listed_in_two_coalitions() {
        let agents = agents(&["A", "B", "C"]);
        let err = resolve_partition(&agents, vec![vec![1, 2], vec![2, 3]]).unwrap_err();
        assert!(matches!(err, Error::PartitionIncomplete(3)));
    }

    #[test]
    fn resolve_partition_rejects_a_zero_index() {
        let agents = agents(&["A"]);
        let err = resolve_partition(&agents, vec![vec![0]]).unwrap_err();
        assert!(matches!(err, Error::PartitionIndexOutOfBounds(0, 1)));
    }
}
