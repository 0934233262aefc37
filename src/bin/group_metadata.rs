//! group_metadata: print the members of a consumer group together with their
//! decoded subscription metadata and partition assignment.
//!
//! Usage: `group_metadata <group> [config-path] [--json]`
//!
//! The config file uses `[global]` / `[topic]` sections (see
//! `kafka_client::config_file`); it defaults to `config/consumer.conf`.

use std::fmt::Display;
use std::process::ExitCode;
use std::time::Duration;

use kafka_client::protocol::ByteView;
use kafka_client::{read_config_or_exit, Consumer, DecodeError, GroupInfo};
use serde::Serialize;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "config/consumer.conf";
const LIST_TIMEOUT: Duration = Duration::from_secs(5);

struct Args {
    group: String,
    config_path: String,
    json: bool,
}

fn parse_args() -> Option<Args> {
    let mut json = false;
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => return None,
            "--json" => json = true,
            _ => positional.push(arg),
        }
    }
    let mut positional = positional.into_iter();
    let group = positional.next()?;
    let config_path = positional
        .next()
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    Some(Args {
        group,
        config_path,
        json,
    })
}

fn print_payload<T: Display>(bytes: &[u8], decoded: &Result<T, DecodeError>) {
    let dump = ByteView::new(bytes).hex_dump();
    if !dump.is_empty() {
        println!("{}", dump);
    }
    match decoded {
        Ok(value) => println!("{}", value),
        Err(err) => println!("undecodable: {}", err),
    }
}

fn print_groups(groups: &[GroupInfo]) {
    for (i, group) in groups.iter().enumerate() {
        if let Some(err) = &group.error {
            eprintln!("group: {} err: {}", group.name, err);
            continue;
        }
        println!("# group[{}]", i);
        for (j, member) in group.members.iter().enumerate() {
            println!("## member[{}]", j);
            println!("id: {}", member.member_id);
            println!("client id: {}", member.client_id);
            println!("host: {}", member.client_host);
            println!("metadata:");
            print_payload(&member.metadata_bytes, &member.metadata);
            println!("assignment:");
            print_payload(&member.assignment_bytes, &member.assignment);
        }
    }
}

fn decoded_json<T: Serialize>(decoded: &Result<T, DecodeError>) -> Value {
    match decoded {
        Ok(value) => serde_json::to_value(value)
            .unwrap_or_else(|err| json!({ "error": err.to_string() })),
        Err(err) => json!({ "error": err.to_string() }),
    }
}

fn groups_json(groups: &[GroupInfo]) -> Value {
    let groups: Vec<Value> = groups
        .iter()
        .map(|group| {
            let members: Vec<Value> = group
                .members
                .iter()
                .map(|member| {
                    json!({
                        "id": member.member_id,
                        "client_id": member.client_id,
                        "host": member.client_host,
                        "metadata": decoded_json(&member.metadata),
                        "assignment": decoded_json(&member.assignment),
                    })
                })
                .collect();
            json!({
                "group": group.name,
                "state": group.state,
                "protocol_type": group.protocol_type,
                "protocol": group.protocol,
                "error": group.error,
                "members": members,
            })
        })
        .collect();
    Value::Array(groups)
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("kafka_client=info".parse()?))
        .init();

    let Some(args) = parse_args() else {
        eprintln!("Usage: group_metadata <group> [config-path] [--json]");
        return Ok(ExitCode::from(1));
    };

    let (mut global, topic) = read_config_or_exit(&args.config_path);
    if !global.set_default_topic_config(topic) {
        anyhow::bail!("{}", global.error());
    }

    let consumer = match Consumer::new(global) {
        Ok(consumer) => consumer,
        Err(err) => {
            eprintln!("Failed to create consumer: {}", err);
            return Ok(ExitCode::from(2));
        }
    };

    let groups = match consumer.list_groups(Some(&args.group), LIST_TIMEOUT) {
        Ok(groups) => groups,
        Err(err) => {
            eprintln!("Failed to list groups: {}", err);
            return Ok(ExitCode::from(3));
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&groups_json(&groups))?);
    } else {
        print_groups(&groups);
    }
    Ok(ExitCode::SUCCESS)
}
