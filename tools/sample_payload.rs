//! Sample Analysis Payload Generator
//!
//! Prints a synthetic analysis response to stdout for exercising the
//! pipeline: rings of every topology, legitimate-looking payroll and
//! merchant accounts, and a salaried receiver paid during business hours.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::info;

const TOPOLOGIES: [&str; 4] = ["cycle_length_3", "fan_in", "fan_out", "layered_shell"];
const LEGITIMATE_NAMES: [&str; 6] = [
    "ACC_PAYROLL_CORP",
    "ACC_MEGA_MART",
    "ACC_CITY_ELECTRIC",
    "ACC_STAFF_FUND",
    "ACC_STORE_042",
    "ACC_ACME_LLC",
];

#[derive(Debug, Serialize)]
struct Account {
    account_id: String,
    suspicion_score: f64,
    detected_patterns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ring_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct Ring {
    ring_id: String,
    member_accounts: Vec<String>,
    pattern_type: String,
    risk_score: f64,
}

#[derive(Debug, Serialize)]
struct Edge {
    source: String,
    target: String,
    amount: f64,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct Summary {
    total_accounts_analyzed: usize,
    suspicious_accounts_flagged: usize,
    fraud_rings_detected: usize,
    processing_time_seconds: f64,
}

#[derive(Debug, Default)]
struct Payload {
    accounts: Vec<Account>,
    rings: Vec<Ring>,
    nodes: Vec<String>,
    edges: Vec<Edge>,
}

/// Payload generator
struct PayloadGenerator {
    rng: rand::rngs::ThreadRng,
    day: NaiveDateTime,
}

impl PayloadGenerator {
    fn new() -> Self {
        let day = NaiveDate::from_ymd_opt(2025, 2, 19)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        Self {
            rng: rand::thread_rng(),
            day,
        }
    }

    fn generate(&mut self, total_accounts: usize, ring_count: usize, fraud_rate: f64) -> Payload {
        let mut payload = Payload {
            nodes: (1..=total_accounts).map(account_id).collect(),
            ..Payload::default()
        };

        // Background traffic between ordinary accounts
        for _ in 0..total_accounts * 2 {
            let source = self.pick(&payload.nodes);
            let target = self.pick(&payload.nodes);
            if source != target {
                let edge = self.edge(&source, &target, 5.0..900.0, 0..24);
                payload.edges.push(edge);
            }
        }

        for r in 0..ring_count {
            let topology = TOPOLOGIES[r % TOPOLOGIES.len()];
            self.add_ring(&mut payload, r + 1, topology);
        }

        for name in LEGITIMATE_NAMES {
            if self.rng.gen_bool(0.5) {
                let patterns = vec!["fan_in".to_string(), "high_velocity".to_string()];
                payload.accounts.push(Account {
                    account_id: name.to_string(),
                    suspicion_score: self.rng.gen_range(70.0..99.0),
                    detected_patterns: patterns,
                    ring_id: None,
                });
                payload.nodes.push(name.to_string());
            }
        }

        self.add_salaried_receiver(&mut payload);

        // Lone high-velocity accounts, some below the exclusion threshold
        for id in payload.nodes.clone() {
            if payload.accounts.iter().any(|a| a.account_id == id) {
                continue;
            }
            if self.rng.gen_bool(fraud_rate) {
                payload.accounts.push(Account {
                    account_id: id,
                    suspicion_score: self.rng.gen_range(40.0..95.0),
                    detected_patterns: vec!["high_velocity".to_string()],
                    ring_id: None,
                });
            }
        }

        payload
    }

    fn add_ring(&mut self, payload: &mut Payload, number: usize, topology: &str) {
        let ring_id = format!("RING_{:03}", number);
        let size = self.rng.gen_range(3..7);
        let mut members: Vec<String> = payload
            .nodes
            .choose_multiple(&mut self.rng, size)
            .cloned()
            .collect();
        members.retain(|m| !payload.accounts.iter().any(|a| &a.account_id == m));
        if members.is_empty() {
            return;
        }

        let pairs: Vec<(usize, usize)> = match topology {
            "cycle_length_3" => (0..members.len()).map(|i| (i, (i + 1) % members.len())).collect(),
            "fan_in" => (0..members.len() - 1).map(|i| (i, members.len() - 1)).collect(),
            "fan_out" => (1..members.len()).map(|i| (0, i)).collect(),
            _ => (0..members.len() - 1).map(|i| (i, i + 1)).collect(),
        };
        for (from, to) in pairs {
            let edge = self.edge(&members[from], &members[to], 2_000.0..9_500.0, 0..6);
            payload.edges.push(edge);
        }

        let risk_score: f64 = self.rng.gen_range(55.0..99.0);
        for member in &members {
            payload.accounts.push(Account {
                account_id: member.clone(),
                suspicion_score: (risk_score + self.rng.gen_range(-10.0..10.0)).clamp(0.0, 100.0),
                detected_patterns: vec![topology.to_string()],
                ring_id: Some(ring_id.clone()),
            });
        }

        payload.rings.push(Ring {
            ring_id,
            member_accounts: members,
            pattern_type: topology.to_string(),
            risk_score,
        });
    }

    /// Regular fixed-size receipts inside office hours
    fn add_salaried_receiver(&mut self, payload: &mut Payload) {
        let receiver = "ACC_77001".to_string();
        let base: f64 = self.rng.gen_range(3_000.0..5_000.0);

        for _ in 0..12 {
            let sender = self.pick(&payload.nodes);
            let mut edge = self.edge(&sender, &receiver, base..base + 40.0, 9..17);
            edge.amount = (edge.amount * 100.0).round() / 100.0;
            payload.edges.push(edge);
        }

        payload.nodes.push(receiver.clone());
        payload.accounts.push(Account {
            account_id: receiver,
            suspicion_score: self.rng.gen_range(75.0..90.0),
            detected_patterns: vec!["fan_in".to_string()],
            ring_id: None,
        });
    }

    fn edge(
        &mut self,
        source: &str,
        target: &str,
        amount: std::ops::Range<f64>,
        hours: std::ops::Range<i64>,
    ) -> Edge {
        let at = self.day
            + Duration::hours(self.rng.gen_range(hours))
            + Duration::minutes(self.rng.gen_range(0..60));
        Edge {
            source: source.to_string(),
            target: target.to_string(),
            amount: (self.rng.gen_range(amount) * 100.0).round() / 100.0,
            timestamp: at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    fn pick(&mut self, ids: &[String]) -> String {
        ids[self.rng.gen_range(0..ids.len())].clone()
    }
}

fn account_id(n: usize) -> String {
    format!("ACC_{:05}", n)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sample_payload=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let accounts: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(200).max(10);
    let rings: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(6);
    let fraud_rate: f64 = args
        .get(3)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.05_f64)
        .clamp(0.0, 1.0);

    info!(accounts, rings, fraud_rate, "Generating sample analysis payload");

    let mut generator = PayloadGenerator::new();
    let payload = generator.generate(accounts, rings, fraud_rate);

    let summary = Summary {
        total_accounts_analyzed: payload.nodes.len(),
        suspicious_accounts_flagged: payload.accounts.len(),
        fraud_rings_detected: payload.rings.len(),
        processing_time_seconds: generator.rng.gen_range(0.5..4.0),
    };

    // Some backend builds emit the misspelled ring key
    let rings_key = if generator.rng.gen_bool(0.2) {
        "fraud_rngs"
    } else {
        "fraud_rings"
    };

    let mut body = serde_json::Map::new();
    body.insert(
        "suspicious_accounts".to_string(),
        serde_json::to_value(&payload.accounts)?,
    );
    body.insert(rings_key.to_string(), serde_json::to_value(&payload.rings)?);
    body.insert("summary".to_string(), serde_json::to_value(&summary)?);
    body.insert("all_nodes".to_string(), serde_json::to_value(&payload.nodes)?);
    body.insert("all_edges".to_string(), serde_json::to_value(&payload.edges)?);

    println!("{}", serde_json::to_string_pretty(&body)?);

    info!(
        suspicious = summary.suspicious_accounts_flagged,
        rings = summary.fraud_rings_detected,
        edges = payload.edges.len(),
        rings_key,
        "Sample payload written"
    );

    Ok(())
}
