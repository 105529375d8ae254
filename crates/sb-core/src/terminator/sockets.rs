//! Parsers for the OS socket listings used to find a port's owner.
//!
//! Kept free of platform gates so they are testable everywhere.

const TCP_LISTEN_STATE: &str = "0A";
const NETSTAT_LISTENING: &str = "LISTENING";

/// Socket inodes in LISTEN state on `port` from `/proc/net/tcp` or
/// `/proc/net/tcp6` contents.
///
/// Row layout: `sl local_address rem_address st tx:rx tr:when retrnsmt uid timeout inode ...`,
/// with addresses as `HEXADDR:HEXPORT`.
pub fn parse_proc_net_tcp(contents: &str, port: u16) -> Vec<u64> {
    contents
        .lines()
        .skip(1)
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 10 || fields[3] != TCP_LISTEN_STATE {
                return None;
            }
            let (_, hex_port) = fields[1].rsplit_once(':')?;
            if u16::from_str_radix(hex_port, 16).ok()? != port {
                return None;
            }
            fields[9].parse::<u64>().ok().filter(|&inode| inode != 0)
        })
        .collect()
}

/// Inode from a `/proc/<pid>/fd/<n>` link target such as `socket:[12345]`.
pub fn parse_socket_link(target: &str) -> Option<u64> {
    target
        .strip_prefix("socket:[")?
        .strip_suffix(']')?
        .parse()
        .ok()
}

/// Pids from `lsof -t` output, one per line.
pub fn parse_lsof_pids(output: &str) -> Vec<u32> {
    let mut pids: Vec<u32> = output
        .lines()
        .filter_map(|line| line.trim().parse().ok())
        .collect();
    pids.sort_unstable();
    pids.dedup();
    pids
}

/// Owning pids of LISTENING TCP sockets on `port` from `netstat -ano -p TCP`.
///
/// Row layout: `TCP  0.0.0.0:8000  0.0.0.0:0  LISTENING  1234`. IPv6 rows
/// look like `TCP  [::]:8000  [::]:0  LISTENING  1234`.
pub fn parse_netstat_listeners(output: &str, port: u16) -> Vec<u32> {
    let mut pids: Vec<u32> = output
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 5
                || !fields[0].eq_ignore_ascii_case("TCP")
                || fields[3] != NETSTAT_LISTENING
            {
                return None;
            }
            let (_, local_port) = fields[1].rsplit_once(':')?;
            if local_port.parse::<u16>().ok()? != port {
                return None;
            }
            fields[4].parse::<u32>().ok().filter(|&pid| pid != 0)
        })
        .collect();
    pids.sort_unstable();
    pids.dedup();
    pids
}
