//! gearctl CLI.

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use tabled::{Table, Tabled};

use gear_client::{GEAR_PORT, GearClient, PortMap};

/// gearctl - drive a gear supervisor daemon
#[derive(Parser)]
#[command(name = "gearctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Daemon host
    #[arg(long, global = true, env = "GEAR_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Daemon port
    #[arg(long, global = true, env = "GEAR_PORT", default_value_t = GEAR_PORT)]
    pub port: u16,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// gearctl commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Create a unit unless one with that name already exists
    Add {
        /// Unit name
        name: String,

        /// Image reference
        image: String,

        /// Port forward as EXTERNAL:INTERNAL (repeatable, order preserved)
        #[arg(short = 'p', long = "publish", value_name = "EXT:INT")]
        ports: Vec<String>,

        /// Link as EXTERNAL:INTERNAL@ADDRESS (repeatable, order preserved)
        #[arg(short = 'l', long = "link", value_name = "EXT:INT@ADDR")]
        links: Vec<String>,
    },

    /// Check whether a unit exists
    Exists {
        /// Unit name
        name: String,
    },

    /// Remove a unit
    Remove {
        /// Unit name
        name: String,
    },

    /// List units known to the daemon
    List,
}

#[derive(Tabled)]
struct UnitRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "IMAGE")]
    image: String,
    #[tabled(rename = "SUBSTATE")]
    sub_state: String,
}

impl Cli {
    /// Execute the CLI command.
    pub async fn execute(self) -> Result<()> {
        let client = GearClient::with_port(&self.host, self.port);
        tracing::debug!(host = %self.host, port = self.port, "Talking to gear daemon");

        match self.command {
            Commands::Add {
                name,
                image,
                ports,
                links,
            } => {
                let ports = ports
                    .iter()
                    .map(|spec| parse_forward(spec))
                    .collect::<Result<Vec<_>>>()?;
                let links = links
                    .iter()
                    .map(|spec| parse_link(spec))
                    .collect::<Result<Vec<_>>>()?;

                client.add(&name, &image, &ports, &links).await?;
                println!("{name} created");
                Ok(())
            }

            Commands::Exists { name } => {
                if client.exists(&name).await? {
                    println!("true");
                    Ok(())
                } else {
                    println!("false");
                    std::process::exit(1);
                }
            }

            Commands::Remove { name } => {
                client.remove(&name).await?;
                println!("{name} removed");
                Ok(())
            }

            Commands::List => {
                let units = client.list().await?;
                if units.is_empty() {
                    println!("No units");
                } else {
                    let rows: Vec<UnitRow> = units
                        .into_iter()
                        .map(|unit| UnitRow {
                            name: unit.name,
                            image: unit.image.unwrap_or_default(),
                            sub_state: unit.sub_state,
                        })
                        .collect();
                    println!("{}", Table::new(rows));
                }
                Ok(())
            }
        }
    }
}

/// Parse an `EXTERNAL:INTERNAL` forward spec.
fn parse_forward(spec: &str) -> Result<PortMap> {
    let (external, internal) = spec
        .split_once(':')
        .ok_or_else(|| eyre!("invalid forward '{spec}', expected EXTERNAL:INTERNAL"))?;
    Ok(PortMap::new(parse_port(internal)?, parse_port(external)?))
}

/// Parse an `EXTERNAL:INTERNAL@ADDRESS` link spec.
fn parse_link(spec: &str) -> Result<PortMap> {
    let (ports, address) = spec
        .split_once('@')
        .ok_or_else(|| eyre!("invalid link '{spec}', expected EXTERNAL:INTERNAL@ADDRESS"))?;
    Ok(parse_forward(ports)?.with_internal_address(address))
}

fn parse_port(value: &str) -> Result<u16> {
    value
        .trim()
        .parse()
        .map_err(|_| eyre!("invalid port '{value}'"))
}
