//! Compressor factories. The two differ in how they treat `min_index = 0`: gzip clamps
//! it to 1 and reports a status warning, zlib rejects it.

use super::{BuildContext, ConfigurableFactory, MementoContext};
use crate::compress::{GzipFileCompressor, ZlibFileCompressor};
use crate::error::Result;
use crate::memento::{Component, HandlerTable, Memento, downcast};
use std::sync::Arc;

const GZIP_MIN_INDEX_KEY: &str = "gzip_file_compressor::min_index";
const ZLIB_MIN_INDEX_KEY: &str = "file_compressor::min_index";

struct GzipFileCompressorMemento {
    handlers: HandlerTable<Self>,
    min_index: i64,
}

impl_memento!(GzipFileCompressorMemento, GzipFileCompressorFactory::TAG);

#[derive(Debug, Clone, Copy, Default)]
pub struct GzipFileCompressorFactory;

impl GzipFileCompressorFactory {
    pub const TAG: &'static str = "gzip_file_compressor";
}

impl ConfigurableFactory for GzipFileCompressorFactory {
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn create_memento(&self, ctx: &mut MementoContext<'_>) -> Box<dyn Memento> {
        ctx.policy.set_numeric(GZIP_MIN_INDEX_KEY, 0, 1000);
        let mut handlers: HandlerTable<GzipFileCompressorMemento> = HandlerTable::new();
        handlers.register_handler("min_index", |m, policy, value| {
            m.min_index = policy.integer(GZIP_MIN_INDEX_KEY, value)?;
            Ok(())
        });
        Box::new(GzipFileCompressorMemento {
            handlers,
            min_index: 1,
        })
    }

    fn create_configurable(
        &self,
        memento: Box<dyn Memento>,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Component> {
        let memento = downcast::<GzipFileCompressorMemento>(memento, Self::TAG)?;
        let min_index = if memento.min_index == 0 {
            ctx.status
                .warn(self.status_origin(), "min_index 0 is not valid, using 1");
            1
        } else {
            u32::try_from(memento.min_index).unwrap_or(1)
        };
        Ok(Component::Compressor(Arc::new(GzipFileCompressor::new(
            min_index,
        ))))
    }
}

struct ZlibFileCompressorMemento {
    handlers: HandlerTable<Self>,
    min_index: i64,
}

impl_memento!(ZlibFileCompressorMemento, ZlibFileCompressorFactory::TAG);

#[derive(Debug, Clone, Copy, Default)]
pub struct ZlibFileCompressorFactory;

impl ZlibFileCompressorFactory {
    pub const TAG: &'static str = "zlib_file_compressor";
}

impl ConfigurableFactory for ZlibFileCompressorFactory {
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn create_memento(&self, ctx: &mut MementoContext<'_>) -> Box<dyn Memento> {
        ctx.policy.set_numeric(ZLIB_MIN_INDEX_KEY, 1, 1000);
        let mut handlers: HandlerTable<ZlibFileCompressorMemento> = HandlerTable::new();
        handlers.register_handler("min_index", |m, policy, value| {
            m.min_index = policy.integer(ZLIB_MIN_INDEX_KEY, value)?;
            Ok(())
        });
        Box::new(ZlibFileCompressorMemento {
            handlers,
            min_index: 1,
        })
    }

    fn create_configurable(
        &self,
        memento: Box<dyn Memento>,
        _ctx: &mut BuildContext<'_>,
    ) -> Result<Component> {
        let memento = downcast::<ZlibFileCompressorMemento>(memento, Self::TAG)?;
        Ok(Component::Compressor(Arc::new(ZlibFileCompressor::new(
            u32::try_from(memento.min_index).unwrap_or(1),
        ))))
    }
}
