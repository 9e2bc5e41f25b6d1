// Wed Jan 15 2026 - Alex

use crate::analysis::{AnalysisError, AnalyzeResult};
use crate::interpreter::CallProbe;
use crate::memory::snapshot::is_ram_vaddr;
use crate::memory::RamImage;
use crate::mips::{decode, Register};
use crate::pattern::database::{
    GP_SETUP, OS_DISABLE_INT, OS_GET_COUNT, OS_INVAL_DCACHE, OS_RESTORE_INT, OS_WRITEBACK_DCACHE,
};
use crate::pattern::{find_all, find_entries, SignatureDatabase};
use crate::utils::logging::ScopedTimer;
use crate::xref::{count_distinct_calls, find_call_sites_to, CallSites};
use log::{debug, info};

/// Words after a call to the first routine of a pair in which the call to
/// the second must appear.
const PAIR_DISTANCE: usize = 0x18;
const GET_TIME_PROLOG_BOUND: usize = 0x10;
const DMA_PROLOG_BOUND: usize = 0x20;
const CONT_INIT_PROLOG_BOUND: usize = 0x20;
const CONT_INIT_SPAN: usize = 0x80;
/// Callers sometimes spill a few words before the frame is allocated.
const ENTRY_SLACK: usize = 5;
const PIF_PROBE_LEAD: usize = 16;
const PADS_PROBE_LEAD: usize = 20;
pub const WINDOW_WORDS: usize = 20;
const VADDR_LIMIT: u32 = 0x80_0000;

/// Index of the nearest `addiu sp, sp, -N` strictly before `start`, no
/// further back than `bound - 1` words.
pub fn find_prolog(image: &[u32], start: usize, bound: usize) -> Result<usize, AnalysisError> {
    let lowest = (start + 1).saturating_sub(bound);
    (lowest..start.min(image.len()))
        .rev()
        .find(|&i| decode(image[i]).is_ok_and(|inst| inst.is_stack_prolog()))
        .ok_or(AnalysisError::PrologNotFound { site: start, bound })
}

fn entry_candidates(prolog: usize) -> impl Iterator<Item = usize> {
    (0..ENTRY_SLACK).filter_map(move |i| prolog.checked_sub(i))
}

/// Picks the stored word nearest to `status`. Candidates are visited in
/// ascending order and a later one only wins when strictly closer.
pub fn nearest_to(status: u32, candidates: impl IntoIterator<Item = u32>) -> Option<u32> {
    let distance = |v: u32| (status as i64 - v as i64).abs();
    candidates.into_iter().fold(None, |best, v| match best {
        Some(b) if distance(v) >= distance(b) => Some(b),
        _ => Some(v),
    })
}

/// Discovery passes over one RAM snapshot.
pub struct Analyzer<'a> {
    image: &'a RamImage,
    db: &'a SignatureDatabase,
}

impl<'a> Analyzer<'a> {
    pub fn new(image: &'a RamImage) -> Self {
        Self {
            image,
            db: SignatureDatabase::builtin(),
        }
    }

    fn words(&self) -> &[u32] {
        self.image.words()
    }

    fn entries(&self, name: &'static str) -> Result<Vec<usize>, AnalysisError> {
        let entries = find_entries(self.words(), self.db.get(name)?);
        if entries.is_empty() {
            return Err(AnalysisError::PatternNotFound(name));
        }
        debug!("{}: {} entry candidates", name, entries.len());
        Ok(entries)
    }

    fn calls_to_signature(&self, name: &'static str) -> Result<CallSites, AnalysisError> {
        let sites = find_call_sites_to(self.words(), &self.entries(name)?)?;
        debug!("{}: {} call sites", name, sites.len());
        Ok(sites)
    }

    /// Region from a call to the first routine of a pair up to the nearest
    /// following call to the second, holding exactly three distinct calls.
    fn paired_region(&self, start: usize, closers: &CallSites) -> Result<usize, AnalysisError> {
        let end = closers
            .first_between(start, start + PAIR_DISTANCE)
            .ok_or_else(|| AnalysisError::Rejected(format!("no closing call after {:#x}", start)))?;
        let found = count_distinct_calls(self.words(), start, end);
        if found != 3 {
            return Err(AnalysisError::CallCountMismatch {
                start,
                end,
                expected: 3,
                found,
            });
        }
        Ok(end)
    }

    /// Entry points of `osGetTime`: a disable-interrupts call, a get-count
    /// call and a restore-interrupts call in a short region.
    pub fn get_time_routines(&self) -> Result<Vec<usize>, AnalysisError> {
        let get_count = self.calls_to_signature(OS_GET_COUNT)?;
        let disable = self.calls_to_signature(OS_DISABLE_INT)?;
        let restore = self.calls_to_signature(OS_RESTORE_INT)?;

        let mut routines = Vec::new();
        for start in disable.iter() {
            let attempt = self.paired_region(start, &restore).and_then(|end| {
                if get_count.first_between(start, end).is_none() {
                    return Err(AnalysisError::Rejected(format!(
                        "no get-count call in [{:#x}, {:#x}]",
                        start, end
                    )));
                }
                find_prolog(self.words(), start, GET_TIME_PROLOG_BOUND)
            });
            match attempt {
                Ok(prolog) => routines.push(prolog),
                Err(e) => debug!("get-time candidate at {:#x}: {}", start, e),
            }
        }
        if routines.is_empty() {
            return Err(AnalysisError::NoCandidate("get-time"));
        }
        debug!("get-time routines: {:x?}", routines);
        Ok(routines)
    }

    /// Entry candidates of `__osSiRawStartDma`: data-cache writeback, a
    /// translation call and invalidate in a short region.
    pub fn dma_start_routines(&self) -> Result<Vec<usize>, AnalysisError> {
        let writeback = self.calls_to_signature(OS_WRITEBACK_DCACHE)?;
        let inval = self.calls_to_signature(OS_INVAL_DCACHE)?;

        let mut routines = Vec::new();
        for start in writeback.iter() {
            let attempt = self
                .paired_region(start, &inval)
                .and_then(|_| find_prolog(self.words(), start, DMA_PROLOG_BOUND));
            match attempt {
                Ok(prolog) => routines.extend(entry_candidates(prolog)),
                Err(e) => debug!("dma-start candidate at {:#x}: {}", start, e),
            }
        }
        if routines.is_empty() {
            return Err(AnalysisError::NoCandidate("dma-start"));
        }
        debug!("dma-start candidates: {:x?}", routines);
        Ok(routines)
    }

    fn check_controller_init(&self, start: usize, dma_calls: &CallSites) -> Result<usize, AnalysisError> {
        let calls: Vec<usize> = dma_calls.between(start, start + CONT_INIT_SPAN).collect();
        if calls.len() != 2 {
            return Err(AnalysisError::CallCountMismatch {
                start,
                end: start + CONT_INIT_SPAN,
                expected: 2,
                found: calls.len(),
            });
        }

        let probe = CallProbe::new(PIF_PROBE_LEAD);
        let first = probe.argument(self.image, calls[0], Register::A1)?;
        let second = probe.argument(self.image, calls[1], Register::A1)?;
        if first != second {
            return Err(AnalysisError::Rejected(format!(
                "dma buffers differ ({:#010x} vs {:#010x})",
                first, second
            )));
        }
        if !is_ram_vaddr(first, VADDR_LIMIT) {
            return Err(AnalysisError::Rejected(format!("{:#010x} is not a RAM address", first)));
        }
        debug!("controller-init at {:#x} passes {:#010x} to dma", start, first);
        find_prolog(self.words(), start, CONT_INIT_PROLOG_BOUND)
    }

    /// Entry candidates of `osContInit`: a get-time call followed by exactly
    /// two DMA calls sharing the same buffer argument.
    pub fn controller_init_routines(
        &self,
        get_times: &[usize],
        dma_starts: &[usize],
    ) -> Result<Vec<usize>, AnalysisError> {
        let get_time_calls = find_call_sites_to(self.words(), get_times)?;
        let dma_calls = find_call_sites_to(self.words(), dma_starts)?;

        let mut routines = Vec::new();
        for start in get_time_calls.iter() {
            match self.check_controller_init(start, &dma_calls) {
                Ok(prolog) => routines.extend(entry_candidates(prolog)),
                Err(e) => debug!("controller-init candidate at {:#x}: {}", start, e),
            }
        }
        if routines.is_empty() {
            return Err(AnalysisError::NoCandidate("controller-init"));
        }
        Ok(routines)
    }

    /// Value loaded into `gp` by the first setup idiom, or 0 when absent.
    pub fn global_pointer(&self) -> Result<u32, AnalysisError> {
        let sig = self.db.get(GP_SETUP)?;
        let Some(&at) = find_all(self.words(), sig.pattern()).first() else {
            debug!("no gp setup found");
            return Ok(0);
        };
        let hi = self.words()[at] & 0xFFFF;
        let lo = self.words()[at + 2] as u16 as i16 as i32 as u32;
        let gp = (hi << 16).wrapping_add(lo);
        debug!("gp = {:#010x} (setup at {:#x})", gp, at);
        Ok(gp)
    }

    fn check_pads(&self, site: usize, gp: u32) -> Result<AnalyzeResult, AnalysisError> {
        let outcome = CallProbe::new(PADS_PROBE_LEAD)
            .with_seed(Register::Gp, gp)
            .run(self.image, site)?;
        let status = outcome.register(Register::A2);
        let mut stored = outcome.into_stored_words();
        if stored.len() < 2 || !stored.remove(&status) {
            return Err(AnalysisError::Rejected(format!(
                "status {:#010x} not among {} stored words",
                status,
                stored.len()
            )));
        }
        let pads = nearest_to(status, stored.iter().copied())
            .ok_or_else(|| AnalysisError::Rejected("no sibling store".to_string()))?;

        let window_start = site
            .checked_sub(WINDOW_WORDS)
            .ok_or_else(|| AnalysisError::Rejected(format!("call at {:#x} too close to RAM start", site)))?;
        let window = self
            .image
            .window(window_start, WINDOW_WORDS)
            .ok_or_else(|| AnalysisError::Rejected(format!("window at {:#x} out of range", window_start)))?
            .to_vec();

        debug!("status {:#010x}, pads {:#010x}", status, pads);
        Ok(AnalyzeResult::new(window_start, window, pads & 0x00FF_FFFF))
    }

    /// Controller pads address from the first controller-init caller whose
    /// stores bracket the status block.
    pub fn controller_pads(&self, cont_inits: &[usize], gp: u32) -> Result<AnalyzeResult, AnalysisError> {
        let sites = find_call_sites_to(self.words(), cont_inits)?;
        for site in sites.iter() {
            match self.check_pads(site, gp) {
                Ok(result) => return Ok(result),
                Err(e) => debug!("controller-init caller at {:#x}: {}", site, e),
            }
        }
        Err(AnalysisError::NoCandidate("controller-pads"))
    }

    pub fn run(&self) -> Result<AnalyzeResult, AnalysisError> {
        let _timer = ScopedTimer::new("analysis");
        let get_times = self.get_time_routines()?;
        let dma_starts = self.dma_start_routines()?;
        let cont_inits = self.controller_init_routines(&get_times, &dma_starts)?;
        let gp = self.global_pointer()?;
        let result = self.controller_pads(&cont_inits, gp)?;
        info!("analysis found {}", result);
        Ok(result)
    }
}

/// Runs every discovery stage over `image`.
pub fn analyze(image: &RamImage) -> Result<AnalyzeResult, AnalysisError> {
    Analyzer::new(image).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixture::{self, Fixture};

    #[test]
    fn test_analyze_synthetic_image() {
        let f = Fixture::new();
        let result = analyze(&f.image()).unwrap();
        assert_eq!(result.input_offset, fixture::PADS_OFFSET);
        assert_eq!(result.window_start, fixture::CALLER_SITE - WINDOW_WORDS);
        assert_eq!(result.window_words.len(), WINDOW_WORDS);
        assert_eq!(result.window_words[0], f.words()[fixture::CALLER_SITE - WINDOW_WORDS]);
    }

    #[test]
    fn test_stages_individually() {
        let f = Fixture::new();
        let image = f.image();
        let a = Analyzer::new(&image);
        assert_eq!(a.get_time_routines().unwrap(), vec![fixture::GET_TIME]);
        let dma = a.dma_start_routines().unwrap();
        assert!(dma.contains(&fixture::DMA_START));
        assert_eq!(a.global_pointer().unwrap(), fixture::GP_VALUE);
        let conts = a
            .controller_init_routines(&[fixture::GET_TIME], &dma)
            .unwrap();
        assert!(conts.contains(&fixture::CONT_INIT));
    }

    #[test]
    fn test_empty_image_has_no_result() {
        let image = RamImage::from_words(vec![0; 0x1000]);
        assert!(matches!(analyze(&image), Err(AnalysisError::PatternNotFound(_))));
    }

    #[test]
    fn test_mismatched_dma_buffers_reject_controller_init() {
        let mut f = Fixture::new();
        // second buffer argument now points elsewhere
        f.set(fixture::CONT_INIT + 9, 0x3C05_8021);
        assert_eq!(
            analyze(&f.image()),
            Err(AnalysisError::NoCandidate("controller-init"))
        );
    }

    #[test]
    fn test_caller_without_status_store_is_skipped() {
        let mut f = Fixture::new();
        let decoy = fixture::CALLER - 0x80;
        f.put(
            decoy,
            &[
                0x3C08_8030, // lui t0, 0x8030
                0xAF88_0000, // sw t0, 0(gp)
                0x2509_0010, // addiu t1, t0, 0x10
                0xAF89_0004, // sw t1, 4(gp)
                0x2786_0100, // addiu a2, gp, 0x100
            ],
        );
        f.set(decoy + 20, 0x0C00_0000 | fixture::CONT_INIT as u32);

        let image = f.image();
        let a = Analyzer::new(&image);
        let sites = find_call_sites_to(image.words(), &[fixture::CONT_INIT]).unwrap();
        assert_eq!(sites.iter().collect::<Vec<_>>(), vec![decoy + 20, fixture::CALLER_SITE]);

        let result = a.controller_pads(&[fixture::CONT_INIT], fixture::GP_VALUE).unwrap();
        assert_eq!(result.input_offset, fixture::PADS_OFFSET);
        assert_eq!(result.window_start, fixture::CALLER_SITE - WINDOW_WORDS);
        assert_eq!(analyze(&image).unwrap().input_offset, fixture::PADS_OFFSET);
    }

    #[test]
    fn test_cache_pair_with_wrong_call_count_is_skipped() {
        let mut f = Fixture::new();
        let decoy = fixture::DMA_START - 0x80;
        let jal = |word: usize| 0x0C00_0000 | word as u32;
        f.put(
            decoy,
            &[
                0x27BD_FFE0, // addiu sp, sp, -0x20
                jal(fixture::WRITEBACK),
                0,
                jal(fixture::INVAL),
                0,
            ],
        );

        let image = f.image();
        let a = Analyzer::new(&image);
        assert_eq!(
            a.paired_region(decoy + 1, &find_call_sites_to(image.words(), &[fixture::INVAL]).unwrap()),
            Err(AnalysisError::CallCountMismatch {
                start: decoy + 1,
                end: decoy + 3,
                expected: 3,
                found: 2,
            })
        );
        let dma = a.dma_start_routines().unwrap();
        assert!(dma.contains(&fixture::DMA_START));
        assert!(!dma.contains(&decoy));
        assert_eq!(analyze(&image).unwrap().input_offset, fixture::PADS_OFFSET);
    }

    #[test]
    fn test_find_prolog() {
        let mut words = vec![0u32; 0x40];
        words[0x10] = 0x27BD_FFE8;
        assert_eq!(find_prolog(&words, 0x18, 0x10), Ok(0x10));
        assert_eq!(find_prolog(&words, 0x1F, 0x10), Ok(0x10));
        assert!(find_prolog(&words, 0x20, 0x10).is_err());
        assert!(find_prolog(&words, 0x10, 0x10).is_err());
        assert!(find_prolog(&words, 3, 0x20).is_err());

        // an undecodable word inside the window is stepped over
        words[0x14] = 0x4600_0000;
        assert_eq!(find_prolog(&words, 0x18, 0x10), Ok(0x10));
    }

    #[test]
    fn test_nearest_to_keeps_first_on_ties() {
        assert_eq!(nearest_to(100, [90, 110]), Some(90));
        assert_eq!(nearest_to(100, [80, 95, 130]), Some(95));
        assert_eq!(nearest_to(100, []), None);
    }
}
