use clap::{Parser, Subcommand};
use coco_assert::config::{DEFAULT_ADAPTOR_NAMESPACE, DEFAULT_ADAPTOR_SELECTOR};
use coco_assert::providers::LibvirtConfig;

#[derive(Parser)]
#[command(name = "coco-assert")]
#[command(about = "Assert on confidential-container pod behavior from logs and events")]
pub struct Cli {
    /// Context
    #[arg(long, global = true)]
    pub context: Option<String>,

    /// Namespace of the pod under test
    #[arg(short = 'n', long, global = true, default_value = "default")]
    pub namespace: String,

    /// Namespace of the cloud-api-adaptor daemonset
    #[arg(long, global = true, default_value = DEFAULT_ADAPTOR_NAMESPACE)]
    pub adaptor_namespace: String,

    /// Label selector of cloud-api-adaptor pods
    #[arg(long, global = true, default_value = DEFAULT_ADAPTOR_SELECTOR)]
    pub adaptor_selector: String,

    /// Seconds to wait for a deciding event (0 waits forever)
    #[arg(long, global = true, default_value_t = 300)]
    pub watch_timeout: u64,

    /// Seconds to wait before reading a pod log
    #[arg(long, global = true, default_value_t = 5)]
    pub settle_delay: u64,

    /// Enable verbose logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub libvirt: LibvirtConfig,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(flatten)]
    Cluster(ClusterCommand),
    /// List registered cloud providers
    Providers,
    /// Print the resolved configuration of a cloud provider
    ProviderConfig {
        name: String,
    },
}

/// Commands that run an evaluator against the cluster.
#[derive(Subcommand, Debug)]
pub enum ClusterCommand {
    /// Measure how long the adaptor took to pull a pod's image
    PullTime {
        /// Pod whose image pull is measured
        pod: String,
    },
    /// Check whether a pod's image was pulled through the guest-pull snapshotter
    Snapshotter {
        pod: String,
    },
    /// Check the outcome of pulling an image that needs registry credentials
    Auth {
        pod: String,
        /// Status the pod is expected to reach (Completed or Failed)
        #[arg(short, long, default_value = "Completed")]
        expected: String,
    },
    /// Count completed and failed pods of a job
    JobTally {
        job: String,
    },
    /// Check that a pod's log contains a string
    LogContains {
        pod: String,
        expected: String,
    },
    /// Print the node a pod is scheduled on
    NodeName {
        pod: String,
    },
    /// Print the first warning event about a pod
    Warning {
        pod: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_auth() {
        let args = vec!["coco-assert", "-n", "coco", "auth", "auth-pod", "-e", "Failed"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.namespace, "coco");
        match cli.command {
            Command::Cluster(ClusterCommand::Auth { pod, expected }) => {
                assert_eq!(pod, "auth-pod");
                assert_eq!(expected, "Failed");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parsing_defaults() {
        let args = vec!["coco-assert", "pull-time", "nginx"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.namespace, "default");
        assert_eq!(cli.adaptor_namespace, DEFAULT_ADAPTOR_NAMESPACE);
        assert_eq!(cli.adaptor_selector, DEFAULT_ADAPTOR_SELECTOR);
        assert_eq!(cli.watch_timeout, 300);
        assert!(!cli.verbose);
        assert!(matches!(
            cli.command,
            Command::Cluster(ClusterCommand::PullTime { pod }) if pod == "nginx"
        ));
    }

    #[test]
    fn test_cli_parsing_global_flags_after_subcommand() {
        let args = vec!["coco-assert", "job-tally", "batch", "--watch-timeout", "0", "-v"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.watch_timeout, 0);
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_parsing_libvirt_flags() {
        let args = vec![
            "coco-assert",
            "--pool-name",
            "peerpods",
            "--disable-cvm",
            "provider-config",
            "libvirt",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.libvirt.pool_name, "peerpods");
        assert!(cli.libvirt.disable_cvm);
        assert_eq!(cli.libvirt.data_dir, "/var/lib/libvirt/images");
        assert!(matches!(cli.command, Command::ProviderConfig { name } if name == "libvirt"));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(vec!["coco-assert"]).is_err());
    }
}
