cfg_loom! {
    pub(crate) use loom::cell::{ConstPtr, MutPtr, UnsafeCell};
}

cfg_not_loom! {
    /// Mirrors the API of `loom::cell::UnsafeCell`.
    pub(crate) struct UnsafeCell<T>(std::cell::UnsafeCell<T>);

    /// Mirrors `loom::cell::ConstPtr`: an immutable access that lasts as long as the value.
    pub(crate) struct ConstPtr<T>(*const T);

    /// Mirrors `loom::cell::MutPtr`: a mutable access that lasts as long as the value.
    pub(crate) struct MutPtr<T>(*mut T);

    #[allow(dead_code)]
    impl<T> UnsafeCell<T> {
        pub(crate) const fn new(data: T) -> Self {
            Self(std::cell::UnsafeCell::new(data))
        }

        #[inline(always)]
        pub(crate) fn with_mut<R>(&self, f: impl FnOnce(*mut T) -> R) -> R {
            f(self.0.get())
        }

        #[inline(always)]
        pub(crate) fn get(&self) -> ConstPtr<T> {
            ConstPtr(self.0.get())
        }

        #[inline(always)]
        pub(crate) fn get_mut(&self) -> MutPtr<T> {
            MutPtr(self.0.get())
        }
    }

    impl<T> ConstPtr<T> {
        /// # Safety
        ///
        /// No `&mut T` may exist while the returned reference is alive.
        #[inline(always)]
        pub(crate) unsafe fn deref(&self) -> &T {
            // SAFETY: guaranteed by the caller.
            unsafe { &*self.0 }
        }
    }

    impl<T> MutPtr<T> {
        /// # Safety
        ///
        /// No other reference to the `T` may exist while the returned one is alive.
        #[inline(always)]
        #[allow(clippy::mut_from_ref)]
        pub(crate) unsafe fn deref(&self) -> &mut T {
            // SAFETY: guaranteed by the caller.
            unsafe { &mut *self.0 }
        }

        #[inline(always)]
        pub(crate) fn with<R>(&self, f: impl FnOnce(*mut T) -> R) -> R {
            f(self.0)
        }
    }
}
