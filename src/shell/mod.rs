/*!
 * Interactive Shell
 *
 * Line-oriented command dispatcher over the simulation engines. Owns one
 * instance of each engine for the process lifetime, routes `malloc`/`free`
 * to the active allocator, and composes translation with the cache
 * hierarchy for `access`.
 */

use crate::alloc::{BlockAllocator, BuddyAllocator, FitStrategy};
use crate::cache::{CacheLevel, ReplacementPolicy};
use crate::core::types::BlockId;
use crate::physical::PhysicalMemory;
use crate::vm::VirtualMemoryTranslator;
use serde_json::json;
use std::fmt::Write as _;

/// Shell prompt rendered before each command line
pub const PROMPT: &str = "memsim> ";

const HELP: &str = "Commands: init memory <n>, set allocator <first_fit|best_fit|worst_fit|buddy>, \
set cache <l1|l2> <size> <block> <assoc> <fifo|lru>, set vm <virt> <page> <phys>, \
malloc <n>, free <id|0xaddr>, dump <memory|buddy>, stats [json], access <addr>, \
vm <init|access|stats>, exit";

/// Which allocator `malloc` and `free` route to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ActiveAllocator {
    #[default]
    Simple,
    Buddy,
}

/// Command dispatcher owning one instance of each engine
#[derive(Default)]
pub struct Shell {
    physical: PhysicalMemory,
    alloc: BlockAllocator,
    buddy: BuddyAllocator,
    l1: CacheLevel,
    l2: CacheLevel,
    vm: VirtualMemoryTranslator,
    active: ActiveAllocator,
}

impl Shell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch one command line; `None` means the shell should exit
    pub fn execute(&mut self, line: &str) -> Option<String> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&cmd) = tokens.first() else {
            return Some(String::new());
        };
        match cmd {
            "exit" | "quit" => None,
            "init" => Some(self.cmd_init(&tokens[1..])),
            "set" => Some(self.cmd_set(&tokens[1..])),
            "malloc" => Some(self.cmd_malloc(&tokens[1..])),
            "free" => Some(self.cmd_free(&tokens[1..])),
            "dump" => Some(self.cmd_dump(&tokens[1..])),
            "stats" => Some(self.cmd_stats(&tokens[1..])),
            "access" => Some(self.cmd_access(&tokens[1..])),
            "vm" => Some(self.cmd_vm(&tokens[1..])),
            _ => Some(format!("Unknown command: {cmd}\n{HELP}")),
        }
    }

    fn cmd_init(&mut self, args: &[&str]) -> String {
        match args {
            ["memory", n] => {
                let Some(n) = parse_number(n) else {
                    return format!("Invalid size: {n}");
                };
                self.physical.init(n);
                self.alloc.init(n);
                self.buddy.init(n);
                format!("Initialized memory {n} bytes")
            }
            _ => "Usage: init memory <bytes>".into(),
        }
    }

    fn cmd_set(&mut self, args: &[&str]) -> String {
        match args {
            ["allocator", s] => {
                if *s == "buddy" {
                    self.active = ActiveAllocator::Buddy;
                    self.buddy.init(self.physical.size());
                } else {
                    self.active = ActiveAllocator::Simple;
                    self.alloc.set_strategy(FitStrategy::parse(s));
                }
                format!("Allocator set to {s}")
            }
            ["cache", level @ ("l1" | "l2"), size, block, assoc, policy] => {
                let (Some(size), Some(block), Some(assoc)) =
                    (parse_number(size), parse_number(block), parse_number(assoc))
                else {
                    return "Usage: set cache <l1|l2> <size> <block> <assoc> <fifo|lru>".into();
                };
                let policy = ReplacementPolicy::parse(policy);
                let cache = match *level {
                    "l1" => &mut self.l1,
                    _ => &mut self.l2,
                };
                match cache.init(size, block, assoc, policy) {
                    Ok(()) => format!(
                        "Initialized {} cache: size={} block={} assoc={} policy={}",
                        level.to_uppercase(),
                        size,
                        block,
                        assoc,
                        policy
                    ),
                    Err(e) => format!("Cache init failed: {e}"),
                }
            }
            ["vm", virt, page, phys] => {
                let (Some(virt), Some(page), Some(phys)) =
                    (parse_number(virt), parse_number(page), parse_number(phys))
                else {
                    return "Usage: set vm <virt> <page> <phys>".into();
                };
                self.vm.init(virt, page, phys);
                "VM initialized".into()
            }
            _ => "Usage: set <allocator|cache|vm> ...".into(),
        }
    }

    fn cmd_malloc(&mut self, args: &[&str]) -> String {
        let Some(n) = args.first().and_then(|t| parse_number(t)) else {
            return "Usage: malloc <bytes>".into();
        };
        match self.active {
            ActiveAllocator::Simple => match self.alloc.allocate(n) {
                Ok(id) => format!("Allocated block id={id}"),
                Err(e) => format!("Allocation failed: {e}"),
            },
            ActiveAllocator::Buddy => match self.buddy.allocate(n) {
                Ok(id) => format!("Allocated buddy id={id}"),
                Err(e) => format!("Buddy allocation failed: {e}"),
            },
        }
    }

    fn cmd_free(&mut self, args: &[&str]) -> String {
        let Some(&token) = args.first() else {
            return "Usage: free <id|0xaddr>".into();
        };
        if token.starts_with("0x") || token.starts_with("0X") {
            let Some(addr) = parse_number(token) else {
                return format!("Invalid address: {token}");
            };
            return match self.active {
                ActiveAllocator::Simple => match self.alloc.free_by_addr(addr) {
                    Ok(()) => format!("Block at {token} freed"),
                    Err(e) => format!("Free failed: {e}"),
                },
                ActiveAllocator::Buddy => {
                    "Free by address not supported for buddy allocator".into()
                }
            };
        }
        let Ok(id) = token.parse::<BlockId>() else {
            return format!("Invalid block id: {token}");
        };
        let result = match self.active {
            ActiveAllocator::Simple => self.alloc.free_by_id(id),
            ActiveAllocator::Buddy => self.buddy.free_by_id(id),
        };
        match result {
            Ok(()) => format!("Block {id} freed"),
            Err(e) => format!("Free failed: {e}"),
        }
    }

    fn cmd_dump(&self, args: &[&str]) -> String {
        match args.first() {
            Some(&"memory") => {
                let mut out = String::new();
                for b in self.alloc.dump() {
                    let end = b.end().saturating_sub(1);
                    if b.free {
                        let _ = writeln!(out, "[0x{:04X} - 0x{:04X}] FREE", b.addr, end);
                    } else {
                        let _ = writeln!(
                            out,
                            "[0x{:04X} - 0x{:04X}] USED (id={}) size={}",
                            b.addr, end, b.id, b.size
                        );
                    }
                }
                out.trim_end().to_string()
            }
            Some(&"buddy") => {
                let dump = self.buddy.dump();
                let mut out = String::from("Buddy allocator dump:");
                for (order, addrs) in dump.free_lists.iter().enumerate() {
                    let joined = addrs
                        .iter()
                        .map(|a| a.to_string())
                        .collect::<Vec<_>>()
                        .join(",");
                    let _ = write!(out, "\norder {} (size={}): {}", order, 1usize << order, joined);
                }
                for a in &dump.allocated {
                    let _ = write!(out, "\nid={} addr={} size={}", a.id, a.addr, a.size);
                }
                out
            }
            _ => "Usage: dump <memory|buddy>".into(),
        }
    }

    fn cmd_stats(&self, args: &[&str]) -> String {
        if args.first() == Some(&"json") {
            let value = json!({
                "allocator": self.alloc.stats(),
                "buddy": self.buddy.stats(),
                "cache_l1": self.l1.stats(),
                "cache_l2": self.l2.stats(),
                "vm": self.vm.stats(),
            });
            return serde_json::to_string_pretty(&value).unwrap_or_default();
        }
        format!(
            "{}\n{}\n{}\n{}\n{}",
            self.alloc.stats(),
            self.buddy.stats(),
            self.l1.stats(),
            self.l2.stats(),
            self.vm.stats()
        )
    }

    fn cmd_access(&mut self, args: &[&str]) -> String {
        let Some(&token) = args.first() else {
            return "Usage: access <addr>".into();
        };
        if !self.l1.is_initialized() {
            return "Error: L1 cache not initialized. Use: set cache l1 <size> <block> <assoc> <fifo|lru>"
                .into();
        }
        let Some(addr) = parse_number(token) else {
            return format!("Invalid address: {token}");
        };
        // Feed the translated address to the cache; fall back to the raw
        // address when translation is unavailable
        let paddr = self.vm.translate(addr).unwrap_or(addr);
        let outcome = self.l1.access_with_level(paddr, Some(&mut self.l2));
        format!(
            "Access {} -> phys=0x{:x} [{} | {} cycles]",
            token,
            paddr,
            outcome,
            outcome.latency()
        )
    }

    fn cmd_vm(&mut self, args: &[&str]) -> String {
        match args {
            ["init", virt, page, phys] => {
                let (Some(virt), Some(page), Some(phys)) =
                    (parse_number(virt), parse_number(page), parse_number(phys))
                else {
                    return "Usage: vm init <virt> <page> <phys>".into();
                };
                self.vm.init(virt, page, phys);
                format!("VM initialized: virt={virt} page={page} phys={phys}")
            }
            ["access", token] => {
                let Some(addr) = parse_number(token) else {
                    return format!("Invalid address: {token}");
                };
                match self.vm.translate(addr) {
                    Ok(paddr) => format!("VM: vaddr={token} -> paddr={paddr}"),
                    Err(e) => format!("VM translation failed: {e}"),
                }
            }
            ["stats"] => self.vm.stats().to_string(),
            _ => "Usage: vm <init|access|stats>".into(),
        }
    }
}

/// Parse a decimal or 0x-prefixed hexadecimal number
fn parse_number(token: &str) -> Option<usize> {
    if let Some(hex) = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        usize::from_str_radix(hex, 16).ok()
    } else {
        token.parse().ok()
    }
}
