//! Host-side structure-of-arrays buffers in the layout the GPU solver uploads.
//!
//! All arrays share the same length and are indexed by the particle's global id. The buffers
//! are sized once from the particle count and the packer only ever writes into them.

use bytemuck::Pod;

use crate::{floating_type_mod::FT, hashing::HashKey, particle_class::ParticleInfo};

/// Typed access to one array of a [`BufferList`].
pub trait BufferKind {
    type Element: Pod + Send + Sync;
    const NAME: &'static str;

    fn get(list: &BufferList) -> &[Self::Element];
    fn get_mut(list: &mut BufferList) -> &mut [Self::Element];
}

macro_rules! decl_buffer_list {
    (pub struct $struct_name:ident / $writer_name:ident { $(pub $field_name:ident: Vec<$field_type:ty> | $default_value:expr => $kind:ident),*$(,)? }) => {
        pub struct $struct_name {
            $(
                $field_name: Vec<$field_type>,
            )*
        }

        /// Exclusive write access to every buffer at once.
        pub struct $writer_name<'a> {
            $(
                pub $field_name: &'a mut [$field_type],
            )*
        }

        impl $struct_name {
            pub fn new(len: usize) -> Self {
                Self {
                    $(
                        $field_name: (0..len).map(|_| $default_value).collect::<Vec<$field_type>>(),
                    )*
                }
            }

            pub fn writer(&mut self) -> $writer_name<'_> {
                $writer_name {
                    $(
                        $field_name: &mut self.$field_name,
                    )*
                }
            }
        }

        $(
            pub enum $kind {}

            impl BufferKind for $kind {
                type Element = $field_type;
                const NAME: &'static str = stringify!($field_name);

                fn get(list: &$struct_name) -> &[$field_type] {
                    &list.$field_name
                }

                fn get_mut(list: &mut $struct_name) -> &mut [$field_type] {
                    &mut list.$field_name
                }
            }
        )*
    }
}

decl_buffer_list! {
    pub struct BufferList / BufferWriter {
        // cell-relative position, mass in w
        pub pos: Vec<[FT; 4]> | [0.; 4] => PosBuffer,
        pub hash: Vec<HashKey> | 0 => HashBuffer,
        // velocity, rest density in w
        pub vel: Vec<[FT; 4]> | [0.; 4] => VelBuffer,
        pub info: Vec<ParticleInfo> | ParticleInfo::default() => InfoBuffer,
    }
}

impl BufferList {
    pub fn len(&self) -> usize {
        self.pos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    pub fn get<K: BufferKind>(&self) -> &[K::Element] {
        K::get(self)
    }

    pub fn get_mut<K: BufferKind>(&mut self) -> &mut [K::Element] {
        K::get_mut(self)
    }

    /// Raw bytes of one array, ready for upload.
    pub fn as_bytes<K: BufferKind>(&self) -> &[u8] {
        bytemuck::cast_slice(K::get(self))
    }
}

impl BufferWriter<'_> {
    pub fn len(&self) -> usize {
        self.pos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_list_is_zeroed_and_sized() {
        let buffers = BufferList::new(17);
        assert_eq!(buffers.len(), 17);
        assert_eq!(buffers.get::<HashBuffer>().len(), 17);
        assert_eq!(buffers.get::<InfoBuffer>().len(), 17);
        assert!(buffers.get::<VelBuffer>().iter().all(|v| *v == [0.; 4]));
        assert!(buffers.get::<PosBuffer>().iter().all(|v| *v == [0.; 4]));
    }

    #[test]
    fn writer_and_typed_access_see_the_same_storage() {
        let mut buffers = BufferList::new(3);
        {
            let mut writer = buffers.writer();
            writer.hash[2] = 42;
            writer.info[1] = ParticleInfo::new(1, 2, 3);
        }
        assert_eq!(buffers.get::<HashBuffer>()[2], 42);
        assert_eq!(buffers.get::<InfoBuffer>()[1], ParticleInfo::new(1, 2, 3));

        buffers.get_mut::<VelBuffer>()[0][3] = 1000.;
        assert_eq!(buffers.writer().vel[0][3], 1000.);
    }

    #[test]
    fn byte_view_has_element_stride() {
        let buffers = BufferList::new(5);
        assert_eq!(buffers.as_bytes::<InfoBuffer>().len(), 5 * 8);
        assert_eq!(buffers.as_bytes::<HashBuffer>().len(), 5 * 4);
        assert_eq!(buffers.as_bytes::<PosBuffer>().len(), 5 * 4 * std::mem::size_of::<FT>());
        assert_eq!(InfoBuffer::NAME, "info");
    }
}
