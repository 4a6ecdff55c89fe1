use alloc::sync::Arc;
use alloc::vec::Vec;

use recycler::WindowOptions;

use crate::UpdateContext;

/// Factory for new physical slots: `create_elements(count)` returns `count` fresh targets.
pub type CreateElements<E> = Arc<dyn Fn(usize) -> Vec<E> + Send + Sync>;

/// Fills a slot with the content of a virtual index.
///
/// Runs synchronously before the slot is positioned. Secondary work (changing the size,
/// scrolling) must go through the [`UpdateContext`]; it is applied on the next turn.
pub type UpdateElement<E> = Arc<dyn Fn(&mut E, usize, &mut UpdateContext) + Send + Sync>;

/// Default idle time before children are reordered after scrolling.
pub const DEFAULT_REORDER_DELAY_MS: u64 = 500;

/// Configuration for [`crate::ListAdapter`].
///
/// Callbacks are stored in `Arc`s so the options stay cheap to clone. Both callbacks are
/// required; [`crate::ListAdapter::new`] fails fast without them.
pub struct AdapterOptions<E> {
    pub create_elements: Option<CreateElements<E>>,
    pub update_element: Option<UpdateElement<E>>,

    /// Restores child order (focus and tab order) once scrolling has been idle.
    pub reorder_elements: bool,
    pub reorder_delay_ms: u64,

    pub window: WindowOptions,
}

impl<E> Clone for AdapterOptions<E> {
    fn clone(&self) -> Self {
        Self {
            create_elements: self.create_elements.clone(),
            update_element: self.update_element.clone(),
            reorder_elements: self.reorder_elements,
            reorder_delay_ms: self.reorder_delay_ms,
            window: self.window,
        }
    }
}

impl<E> Default for AdapterOptions<E> {
    fn default() -> Self {
        Self {
            create_elements: None,
            update_element: None,
            reorder_elements: false,
            reorder_delay_ms: DEFAULT_REORDER_DELAY_MS,
            window: WindowOptions::default(),
        }
    }
}

impl<E> AdapterOptions<E> {
    /// Creates options with both required callbacks.
    pub fn new(
        create_elements: impl Fn(usize) -> Vec<E> + Send + Sync + 'static,
        update_element: impl Fn(&mut E, usize, &mut UpdateContext) + Send + Sync + 'static,
    ) -> Self {
        Self::default()
            .with_create_elements(create_elements)
            .with_update_element(update_element)
    }

    pub fn with_create_elements(
        mut self,
        create_elements: impl Fn(usize) -> Vec<E> + Send + Sync + 'static,
    ) -> Self {
        self.create_elements = Some(Arc::new(create_elements));
        self
    }

    pub fn with_update_element(
        mut self,
        update_element: impl Fn(&mut E, usize, &mut UpdateContext) + Send + Sync + 'static,
    ) -> Self {
        self.update_element = Some(Arc::new(update_element));
        self
    }

    pub fn with_reorder_elements(mut self, reorder_elements: bool) -> Self {
        self.reorder_elements = reorder_elements;
        self
    }

    pub fn with_reorder_delay_ms(mut self, delay_ms: u64) -> Self {
        self.reorder_delay_ms = delay_ms;
        self
    }

    pub fn with_window(mut self, window: WindowOptions) -> Self {
        self.window = window;
        self
    }

    pub fn with_estimated_item_height(mut self, height: u32) -> Self {
        self.window = self.window.with_estimated_item_height(height);
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.window = self.window.with_overscan(overscan);
        self
    }

    pub fn with_max_physical_count(mut self, max: usize) -> Self {
        self.window = self.window.with_max_physical_count(max);
        self
    }
}

impl<E> core::fmt::Debug for AdapterOptions<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AdapterOptions")
            .field("has_create_elements", &self.create_elements.is_some())
            .field("has_update_element", &self.update_element.is_some())
            .field("reorder_elements", &self.reorder_elements)
            .field("reorder_delay_ms", &self.reorder_delay_ms)
            .field("window", &self.window)
            .finish()
    }
}
