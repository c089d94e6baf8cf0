//! Parse cache shared by everything that reads shipped source text.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use ogx_analyzer::SourceModule;
use ogx_core::SourceFile;

/// Parsed modules keyed by path.
///
/// Many functions of one module share a file; the file is parsed once per
/// session. An entry whose text no longer matches is parsed again.
#[derive(Default)]
pub struct SourceCache {
    modules: RefCell<HashMap<String, Rc<SourceModule>>>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, file: &SourceFile) -> Rc<SourceModule> {
        let cached = self.modules.borrow().get(&file.path).cloned();
        if let Some(module) = cached.filter(|m| m.text() == file.text) {
            tracing::trace!(path = %file.path, "source cache hit");
            return module;
        }
        let module = Rc::new(SourceModule::parse(file.text.as_str()));
        self.modules
            .borrow_mut()
            .insert(file.path.clone(), Rc::clone(&module));
        module
    }

    pub fn len(&self) -> usize {
        self.modules.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.borrow().is_empty()
    }
}
